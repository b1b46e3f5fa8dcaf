//! Exponential backoff.

use super::{BackoffStrategy, DEFAULT_DELAY, DEFAULT_MAX_RETRIES, millis, retries_before};
use crate::bounds::bounded_millis;
use crate::config::Tunables;
use std::time::Duration;

/// Exponential backoff without jitter.
///
/// Delays between retries grow as `base * scale_factor^(n - 1)`. A scale
/// factor below 1 would shrink the delay, so the multiplier is floored at 1.
///
/// # Formula
///
/// For attempt `n` (starting at 1):
/// ```text
/// delay = base_ms * max(1, scale_factor ^ (n - 1))
/// ```
///
/// The result saturates at `Duration::MAX` instead of overflowing.
///
/// # Examples
///
/// ```rust
/// use rebound_core::strategy::{BackoffStrategy, ExponentialDelay};
/// use std::time::Duration;
///
/// let strategy = ExponentialDelay::new(2.0, 10, Duration::from_millis(2));
///
/// assert_eq!(strategy.raw_delay_millis(10), 1024.0);
/// assert_eq!(strategy.next_delay(10), Duration::from_millis(1024));
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: O(1) - no allocations
/// - **CPU**: O(1) per call - one `powf`
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialDelay {
    scale_factor: f64,
    max_retries: u64,
    delay: Duration,
}

impl ExponentialDelay {
    /// Create an exponential strategy.
    pub fn new(scale_factor: f64, max_retries: u64, delay: Duration) -> Self {
        Self {
            scale_factor,
            max_retries,
            delay,
        }
    }

    /// Create an exponential strategy with the built-in delay and retry bound.
    pub fn from_scale_factor(scale_factor: f64) -> Self {
        Self::new(scale_factor, DEFAULT_MAX_RETRIES, DEFAULT_DELAY)
    }

    /// Create an exponential strategy from tunable defaults.
    pub fn from_tunables(scale_factor: f64, tunables: &Tunables) -> Self {
        Self::new(scale_factor, tunables.max_retries, tunables.delay)
    }

    /// Multiplier applied per retry.
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
        // NaN and anything below 1 collapse to 1.
        let factor = self.scale_factor.powf(retries_before(attempt)).max(1.0);
        millis(self.delay) * factor
    }
}

impl BackoffStrategy for ExponentialDelay {
    fn should_quit(&self, attempt: u64) -> bool {
        attempt > self.max_retries
    }

    fn next_delay(&self, attempt: u64) -> Duration {
        bounded_millis(self.raw_delay_millis(attempt))
    }
}
