//! Retry forever with a fixed sleep.

use super::{BackoffStrategy, DEFAULT_INFINITE_SLEEP};
use crate::bounds::DelayBounds;
use std::time::Duration;

/// Never gives up; sleeps a fixed time between attempts.
///
/// A session using this strategy only ends when the operation succeeds with
/// a satisfying value, raises a non-retryable error, or a listener fails.
/// Wrap it in [`MaxRetries`](super::MaxRetries) to bound it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfiniteRetries {
    sleep: Duration,
}

impl InfiniteRetries {
    /// Retry forever, sleeping `sleep` between attempts.
    pub fn new(sleep: Duration) -> Self {
        Self { sleep }
    }

    /// Configured sleep.
    pub fn sleep(&self) -> Duration {
        self.sleep
    }
}

impl Default for InfiniteRetries {
    fn default() -> Self {
        Self::new(DEFAULT_INFINITE_SLEEP)
    }
}

impl BackoffStrategy for InfiniteRetries {
    fn should_quit(&self, _attempt: u64) -> bool {
        false
    }

    fn next_delay(&self, _attempt: u64) -> Duration {
        DelayBounds::default().clamp(self.sleep)
    }
}
