//! In-process counter store.
//!
//! Valid for a single-process deployment only: state is lost on restart
//! and is not shared across replicas. Use [`super::PostgresCounterStore`]
//! when running more than one instance behind a load balancer.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{CounterStore, StoreError};

#[derive(Debug, Clone, Copy)]
struct Window {
    start: i64,
    period_secs: i64,
    count: u32,
}

/// Fixed-window counters behind a mutex. The lock makes each
/// check-and-increment atomic across concurrent requests.
#[derive(Default)]
pub struct MemoryCounterStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryCounterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CounterStore for MemoryCounterStore {
    async fn try_acquire(
        &self,
        bucket: &str,
        window_start: i64,
        period_secs: i64,
        limit: u32,
    ) -> Result<Option<u32>, StoreError> {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let window = windows
            .entry(bucket.to_string())
            .or_insert(Window { start: window_start, period_secs, count: 0 });

        // A different window start means the old window elapsed (or the
        // clock stepped); either way the counter resets.
        if window.start != window_start {
            window.start = window_start;
            window.period_secs = period_secs;
            window.count = 0;
        }

        if window.count >= limit {
            return Ok(None);
        }
        window.count += 1;
        Ok(Some(window.count))
    }

    async fn sweep(&self, now: i64) -> Result<u64, StoreError> {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = windows.len();
        windows.retain(|_, w| w.start + w.period_secs > now);
        Ok(u64::try_from(before - windows.len()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
