//! Prediction log persistence and usage queries.
//!
//! Log entries are immutable: one row per served prediction, never
//! updated or deleted by this service. The insert commits before the
//! response is sent, so a logging failure fails the request.

use sqlx::PgPool;
use uuid::Uuid;

use crate::predictor::Features;

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("failed to serialize features: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Append one prediction log entry; returns the new row id.
///
/// # Errors
///
/// Returns [`PredictionError`] when serialization or the insert fails.
pub async fn log_prediction(
    pool: &PgPool,
    features: &Features,
    predicted_price: f64,
    api_key: Option<&str>,
) -> Result<Uuid, PredictionError> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO prediction_logs (id, features, predicted_price, api_key) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(serde_json::to_value(features)?)
        .bind(predicted_price)
        .bind(api_key)
        .execute(pool)
        .await?;
    Ok(id)
}

/// Count the key's logged predictions in the current calendar month.
///
/// # Errors
///
/// Returns [`PredictionError`] when the query fails.
pub async fn monthly_usage(pool: &PgPool, api_key: &str) -> Result<i64, PredictionError> {
    let count: i64 = sqlx::query_scalar(
        r"SELECT COUNT(*)
          FROM prediction_logs
          WHERE api_key = $1
            AND date_trunc('month', created_at) = date_trunc('month', now())",
    )
    .bind(api_key)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

#[cfg(all(test, feature = "live-db-tests"))]
mod tests {
    use super::*;

    fn sample_features() -> Features {
        Features {
            overall_qual: 7,
            gr_liv_area: 1710.0,
            garage_cars: 2,
            total_bsmt_sf: 856.0,
            year_built: 2003,
        }
    }

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
        crate::db::init_pool(&url).await.expect("database init failed")
    }

    #[tokio::test]
    async fn log_then_usage_round_trip() {
        let pool = test_pool().await;
        let key = format!("test-key-{}", Uuid::new_v4());

        let before = monthly_usage(&pool, &key).await.unwrap();
        assert_eq!(before, 0);

        log_prediction(&pool, &sample_features(), 385_540.0, Some(&key))
            .await
            .unwrap();

        let after = monthly_usage(&pool, &key).await.unwrap();
        assert_eq!(after, before + 1);
    }

    #[tokio::test]
    async fn anonymous_entries_do_not_count_toward_any_key() {
        let pool = test_pool().await;
        let key = format!("test-key-{}", Uuid::new_v4());

        log_prediction(&pool, &sample_features(), 385_540.0, None).await.unwrap();
        assert_eq!(monthly_usage(&pool, &key).await.unwrap(), 0);
    }
}
