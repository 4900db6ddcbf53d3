//! Shared counter store backed by PostgreSQL.
//!
//! DESIGN
//! ======
//! One conditional upsert per check: the `DO UPDATE ... WHERE` clause
//! either claims a slot and returns the new count, or matches no row
//! and returns nothing, which reads as a rejection. Row-level locking
//! in Postgres linearizes concurrent claims on the same bucket, so the
//! budget holds across horizontally scaled instances.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{CounterStore, StoreError};

const STORE_MAX_CONNECTIONS: u32 = 5;

pub struct PostgresCounterStore {
    pool: PgPool,
}

impl PostgresCounterStore {
    /// Connect to the counter database and ensure the counter table
    /// exists. The table is created here, not in the application
    /// migrations, because the store may live in a separate database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the connection or table setup fails.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(STORE_MAX_CONNECTIONS)
            .connect(url)
            .await?;

        sqlx::query(
            r"CREATE TABLE IF NOT EXISTS rate_limit_counters (
                  bucket TEXT PRIMARY KEY,
                  window_start BIGINT NOT NULL,
                  period_secs BIGINT NOT NULL,
                  count BIGINT NOT NULL
              )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl CounterStore for PostgresCounterStore {
    async fn try_acquire(
        &self,
        bucket: &str,
        window_start: i64,
        period_secs: i64,
        limit: u32,
    ) -> Result<Option<u32>, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as(
            r"INSERT INTO rate_limit_counters AS c (bucket, window_start, period_secs, count)
              VALUES ($1, $2, $3, 1)
              ON CONFLICT (bucket) DO UPDATE SET
                  count = CASE WHEN c.window_start = $2 THEN c.count + 1 ELSE 1 END,
                  window_start = $2,
                  period_secs = $3
              WHERE c.window_start <> $2 OR c.count < $4
              RETURNING c.count",
        )
        .bind(bucket)
        .bind(window_start)
        .bind(period_secs)
        .bind(i64::from(limit))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(count,)| u32::try_from(count).unwrap_or(u32::MAX)))
    }

    async fn sweep(&self, now: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM rate_limit_counters WHERE window_start + period_secs <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
