//! Tiered request rate limiting.
//!
//! DESIGN
//! ======
//! Fixed-window counters keyed by `"{policy}:{caller}"`. Window
//! boundaries are aligned to epoch multiples of the policy period, so
//! the reset time is computable from the clock alone, without a store
//! round trip. A burst straddling a window boundary can admit up to
//! twice the nominal budget; that is the accepted trade-off of the
//! fixed-window algorithm.
//!
//! The counter store is pluggable: [`MemoryCounterStore`] for a single
//! process, [`PostgresCounterStore`] when horizontally scaled replicas
//! must share budgets. Check-and-increment is atomic in both stores, so
//! two concurrent requests can never both claim the last slot.
//!
//! Store failures propagate as [`StoreError`]; the HTTP edge fails
//! closed on them rather than silently admitting traffic.

pub mod memory;
pub mod policy;
pub mod postgres;

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use memory::MemoryCounterStore;
pub use policy::{Policy, PolicyParseError};
pub use postgres::PostgresCounterStore;

const SWEEP_INTERVAL_SECS: u64 = 300;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("counter store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Outcome of one check-and-increment call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitDecision {
    pub allowed: bool,
    pub limit: u32,
    /// Budget left in the active window, clamped at zero.
    pub remaining: u32,
    /// Seconds until the active window rolls over.
    pub retry_after_secs: u64,
    /// Header-facing period label, e.g. `minute`.
    pub period: String,
}

/// Atomic fixed-window admission counter.
#[async_trait::async_trait]
pub trait CounterStore: Send + Sync {
    /// Admit one request into the window starting at `window_start`,
    /// unless `limit` is already reached. Returns the admitted count so
    /// far, or `None` when the budget is exhausted. The check and the
    /// increment are a single atomic step; a rejected call must not
    /// consume budget.
    async fn try_acquire(
        &self,
        bucket: &str,
        window_start: i64,
        period_secs: i64,
        limit: u32,
    ) -> Result<Option<u32>, StoreError>;

    /// Drop state for windows that ended at or before `now`. Returns
    /// the number of entries removed.
    async fn sweep(&self, now: i64) -> Result<u64, StoreError>;
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// In-process limiter, the default for single-instance deployments.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCounterStore::new()))
    }

    /// Check the caller's budget under `policy` and claim one slot if
    /// any remains. The counter is not incremented on rejection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the counter store is unreachable.
    pub async fn check_and_increment(&self, caller_key: &str, policy: &Policy) -> Result<LimitDecision, StoreError> {
        self.check_at(caller_key, policy, unix_now()).await
    }

    /// Internal: check with an explicit clock (for testing).
    async fn check_at(&self, caller_key: &str, policy: &Policy, now: i64) -> Result<LimitDecision, StoreError> {
        #[allow(clippy::cast_possible_wrap)]
        let period = policy.period_secs() as i64;
        let window_start = now - now.rem_euclid(period);
        #[allow(clippy::cast_sign_loss)]
        let retry_after_secs = (window_start + period - now) as u64;

        let bucket = format!("{policy}:{caller_key}");
        let admitted = self
            .store
            .try_acquire(&bucket, window_start, period, policy.max())
            .await?;

        Ok(match admitted {
            Some(count) => LimitDecision {
                allowed: true,
                limit: policy.max(),
                remaining: policy.max().saturating_sub(count),
                retry_after_secs,
                period: policy.period_label(),
            },
            None => LimitDecision {
                allowed: false,
                limit: policy.max(),
                remaining: 0,
                retry_after_secs,
                period: policy.period_label(),
            },
        })
    }

    /// Drop expired window state from the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the counter store is unreachable.
    pub async fn sweep(&self) -> Result<u64, StoreError> {
        self.store.sweep(unix_now()).await
    }
}

fn unix_now() -> i64 {
    // Wall-clock windows: a clock step shifts boundaries, which the
    // fixed-window algorithm already tolerates.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
        .unwrap_or(0)
}

/// Spawn the periodic sweep of expired window state.
pub fn spawn_sweep_task(limiter: RateLimiter) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            ticker.tick().await;
            match limiter.sweep().await {
                Ok(removed) if removed > 0 => {
                    tracing::debug!(removed, "swept expired rate-limit windows");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "rate-limit sweep failed"),
            }
        }
    })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
