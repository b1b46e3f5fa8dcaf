//! Constant delay between attempts.

use super::{BackoffStrategy, DEFAULT_DELAY, DEFAULT_MAX_RETRIES};
use crate::bounds::DelayBounds;
use crate::config::Tunables;
use std::time::Duration;

/// Waits the same delay before every retry.
///
/// This is the strategy installed by default: 1 second between attempts,
/// 30 retries.
///
/// # Examples
///
/// ```rust
/// use rebound_core::strategy::{BackoffStrategy, ConstantDelay};
/// use std::time::Duration;
///
/// let strategy = ConstantDelay::new(2, Duration::from_millis(100));
///
/// assert_eq!(strategy.next_delay(1), Duration::from_millis(100));
/// assert_eq!(strategy.next_delay(2), Duration::from_millis(100));
/// assert!(strategy.should_quit(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantDelay {
    max_retries: u64,
    delay: Duration,
}

impl ConstantDelay {
    /// Create a constant strategy.
    pub fn new(max_retries: u64, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Create a constant strategy from tunable defaults.
    pub fn from_tunables(tunables: &Tunables) -> Self {
        Self::new(tunables.max_retries, tunables.delay)
    }

    /// Configured delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Configured retry bound.
    pub fn max_retries(&self) -> u64 {
        self.max_retries
    }
}

impl Default for ConstantDelay {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_DELAY)
    }
}

impl BackoffStrategy for ConstantDelay {
    fn should_quit(&self, attempt: u64) -> bool {
        attempt > self.max_retries
    }

    fn next_delay(&self, _attempt: u64) -> Duration {
        DelayBounds::default().clamp(self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_round_trip() {
        let strategy = ConstantDelay::new(12, Duration::from_millis(345));

        assert_eq!(strategy.max_retries(), 12);
        assert_eq!(strategy.delay(), Duration::from_millis(345));
    }

    #[test]
    fn test_default_uses_builtin_tunables() {
        let strategy = ConstantDelay::default();

        assert_eq!(strategy.max_retries(), 30);
        assert_eq!(strategy.delay(), Duration::from_secs(1));
        assert_eq!(strategy, ConstantDelay::from_tunables(&Tunables::default()));
    }

    #[test]
    fn test_delay_independent_of_attempt() {
        let strategy = ConstantDelay::new(5, Duration::from_millis(40));

        for attempt in [1, 2, 10, u64::MAX] {
            assert_eq!(strategy.next_delay(attempt), Duration::from_millis(40));
        }
    }

    #[test]
    fn test_zero_delay_is_raised_to_one_millisecond() {
        let strategy = ConstantDelay::new(5, Duration::ZERO);
        assert_eq!(strategy.next_delay(1), Duration::from_millis(1));
    }

    #[test]
    fn test_should_quit_boundary() {
        let strategy = ConstantDelay::default();

        assert!(!strategy.should_quit(29));
        assert!(!strategy.should_quit(30));
        assert!(strategy.should_quit(31));
    }

    #[test]
    fn test_zero_retries_quits_after_first_attempt() {
        let strategy = ConstantDelay::new(0, Duration::from_millis(1));
        assert!(strategy.should_quit(1));
    }
}
