//! Linear backoff.

use super::{BackoffStrategy, DEFAULT_DELAY, DEFAULT_MAX_RETRIES, millis, retries_before};
use crate::bounds::bounded_millis;
use crate::config::Tunables;
use std::time::Duration;

/// Delay grows by `scale_factor` milliseconds per retry.
///
/// # Formula
///
/// For attempt `n` (starting at 1):
/// ```text
/// delay = base_ms + max(0, (n - 1) * scale_factor)
/// ```
///
/// A negative scale factor contributes nothing, so the delay never drops
/// below the base delay.
///
/// # Examples
///
/// ```rust
/// use rebound_core::strategy::{BackoffStrategy, LinearDelay};
/// use std::time::Duration;
///
/// let strategy = LinearDelay::new(10.0, 5, Duration::from_millis(10));
///
/// assert_eq!(strategy.next_delay(1), Duration::from_millis(10));
/// assert_eq!(strategy.next_delay(2), Duration::from_millis(20));
/// assert_eq!(strategy.next_delay(10), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDelay {
    scale_factor: f64,
    max_retries: u64,
    delay: Duration,
}

impl LinearDelay {
    /// Create a linear strategy.
    pub fn new(scale_factor: f64, max_retries: u64, delay: Duration) -> Self {
        Self {
            scale_factor,
            max_retries,
            delay,
        }
    }

    /// Create a linear strategy with the built-in delay and retry bound.
    pub fn from_scale_factor(scale_factor: f64) -> Self {
        Self::new(scale_factor, DEFAULT_MAX_RETRIES, DEFAULT_DELAY)
    }

    /// Create a linear strategy from tunable defaults.
    pub fn from_tunables(scale_factor: f64, tunables: &Tunables) -> Self {
        Self::new(scale_factor, tunables.max_retries, tunables.delay)
    }

    /// Milliseconds added per retry.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Configured retry bound.
    pub fn max_retries(&self) -> u64 {
        self.max_retries
    }

    /// Base delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Unbounded delay for `attempt`, in milliseconds.
    pub fn raw_delay_millis(&self, attempt: u64) -> f64 {
        let growth = (retries_before(attempt) * self.scale_factor).max(0.0);
        millis(self.delay) + growth
    }
}

impl BackoffStrategy for LinearDelay {
    fn should_quit(&self, attempt: u64) -> bool {
        attempt > self.max_retries
    }

    fn next_delay(&self, attempt: u64) -> Duration {
        bounded_millis(self.raw_delay_millis(attempt))
    }
}
