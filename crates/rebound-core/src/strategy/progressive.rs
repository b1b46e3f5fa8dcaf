//! Progressive backoff: linear growth measured in multiples of the base delay.

use super::{BackoffStrategy, DEFAULT_DELAY, DEFAULT_MAX_RETRIES, millis, retries_before};
use crate::bounds::bounded_millis;
use crate::config::Tunables;
use std::time::Duration;

/// Delay grows by `base * scale_factor` per retry.
///
/// # Formula
///
/// For attempt `n` (starting at 1):
/// ```text
/// delay = base_ms                                        if n <= 1
/// delay = base_ms + max(0, base_ms * scale_factor * (n - 1))   otherwise
/// ```
///
/// # Examples
///
/// ```rust
/// use rebound_core::strategy::{BackoffStrategy, ProgressiveDelay};
/// use std::time::Duration;
///
/// let strategy = ProgressiveDelay::new(10.0, 5, Duration::from_millis(2));
///
/// assert_eq!(strategy.next_delay(1), Duration::from_millis(2));
/// assert_eq!(strategy.next_delay(2), Duration::from_millis(22));
/// assert_eq!(strategy.next_delay(3), Duration::from_millis(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressiveDelay {
    scale_factor: f64,
    max_retries: u64,
    delay: Duration,
}

impl ProgressiveDelay {
    /// Create a progressive strategy.
    pub fn new(scale_factor: f64, max_retries: u64, delay: Duration) -> Self {
        Self {
            scale_factor,
            max_retries,
            delay,
        }
    }

    /// Create a progressive strategy with the built-in delay and retry bound.
    pub fn from_scale_factor(scale_factor: f64) -> Self {
        Self::new(scale_factor, DEFAULT_MAX_RETRIES, DEFAULT_DELAY)
    }

    /// Create a progressive strategy from tunable defaults.
    pub fn from_tunables(scale_factor: f64, tunables: &Tunables) -> Self {
        Self::new(scale_factor, tunables.max_retries, tunables.delay)
    }

    /// Multiple of the base delay added per retry.
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
        let base = millis(self.delay);
        if attempt <= 1 {
            return base;
        }
        base + (base * self.scale_factor * retries_before(attempt)).max(0.0)
    }
}

impl BackoffStrategy for ProgressiveDelay {
    fn should_quit(&self, attempt: u64) -> bool {
        attempt > self.max_retries
    }

    fn next_delay(&self, attempt: u64) -> Duration {
        bounded_millis(self.raw_delay_millis(attempt))
    }
}
