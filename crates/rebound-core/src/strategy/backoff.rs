//! The strategy trait and the retry-cap adapter.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// A policy deciding how long to wait between attempts and when to give up.
///
/// Implementations determine when to stop retrying and how long to wait
/// before the next attempt. The engine drives them; strategies never sleep
/// themselves.
///
/// # Contract
///
/// - `attempt` is the number of the attempt that just failed, starting at 1.
/// - The engine calls [`should_quit`](Self::should_quit) first and only asks
///   for [`next_delay`](Self::next_delay) when it returned `false`.
/// - Both methods must be pure functions of `attempt`, so one strategy can be
///   shared by any number of concurrent sessions.
///
/// # Examples
///
/// A custom strategy is a plain struct implementing the two methods:
///
/// ```rust
/// use rebound_core::strategy::BackoffStrategy;
/// use std::time::Duration;
///
/// #[derive(Debug)]
/// struct Fibonacci {
///     max_retries: u64,
/// }
///
/// impl BackoffStrategy for Fibonacci {
///     fn should_quit(&self, attempt: u64) -> bool {
///         attempt > self.max_retries
///     }
///
///     fn next_delay(&self, attempt: u64) -> Duration {
///         let (mut a, mut b) = (1u64, 1u64);
///         for _ in 1..attempt {
///             (a, b) = (b, a.saturating_add(b));
///         }
///         Duration::from_millis(a)
///     }
/// }
///
/// let strategy = Fibonacci { max_retries: 5 };
/// assert_eq!(strategy.next_delay(5), Duration::from_millis(5));
/// assert!(strategy.should_quit(6));
/// ```
pub trait BackoffStrategy: Debug + Send + Sync {
    /// Whether the session should stop after `attempt` failed.
    ///
    /// # Returns
    /// - `true`: Give up and surface the last outcome
    /// - `false`: Wait [`next_delay`](Self::next_delay) and try again
    fn should_quit(&self, attempt: u64) -> bool;

    /// Delay to wait after `attempt` failed, before the next attempt.
    fn next_delay(&self, attempt: u64) -> Duration;
}

impl<S: BackoffStrategy + ?Sized> BackoffStrategy for Arc<S> {
    fn should_quit(&self, attempt: u64) -> bool {
        (**self).should_quit(attempt)
    }

    fn next_delay(&self, attempt: u64) -> Duration {
        (**self).next_delay(attempt)
    }
}

impl<S: BackoffStrategy + ?Sized> BackoffStrategy for Box<S> {
    fn should_quit(&self, attempt: u64) -> bool {
        (**self).should_quit(attempt)
    }

    fn next_delay(&self, attempt: u64) -> Duration {
        (**self).next_delay(attempt)
    }
}

/// Caps a strategy at a fixed number of retries while keeping its delays.
///
/// The wrapped strategy's own bound is ignored, which also turns
/// [`InfiniteRetries`](super::InfiniteRetries) into a finite strategy.
///
/// # Examples
///
/// ```rust
/// use rebound_core::strategy::{BackoffStrategy, InfiniteRetries, MaxRetries};
/// use std::time::Duration;
///
/// let strategy = MaxRetries::new(InfiniteRetries::new(Duration::from_millis(10)), 2);
///
/// assert!(!strategy.should_quit(2));
/// assert!(strategy.should_quit(3));
/// assert_eq!(strategy.next_delay(1), Duration::from_millis(10));
/// ```
#[derive(Debug, Clone)]
pub struct MaxRetries<S> {
    inner: S,
    max_retries: u64,
}

impl<S> MaxRetries<S> {
    /// Cap `inner` at `max_retries` retries.
    pub fn new(inner: S, max_retries: u64) -> Self {
        Self { inner, max_retries }
    }

    /// The retry bound.
    pub fn max_retries(&self) -> u64 {
        self.max_retries
    }

    /// The wrapped strategy.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: BackoffStrategy> BackoffStrategy for MaxRetries<S> {
    fn should_quit(&self, attempt: u64) -> bool {
        attempt > self.max_retries
    }

    fn next_delay(&self, attempt: u64) -> Duration {
        self.inner.next_delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{ConstantDelay, LinearDelay};

    #[test]
    fn test_max_retries_overrides_inner_bound() {
        let strategy = MaxRetries::new(ConstantDelay::new(100, Duration::from_millis(5)), 1);

        assert!(!strategy.should_quit(1));
        assert!(strategy.should_quit(2));
        assert_eq!(strategy.max_retries(), 1);
        assert_eq!(strategy.inner().max_retries(), 100);
    }

    #[test]
    fn test_max_retries_keeps_delay_curve() {
        let inner = LinearDelay::new(10.0, 3, Duration::from_millis(10));
        let strategy = MaxRetries::new(inner.clone(), 50);

        for attempt in 1..20 {
            assert_eq!(strategy.next_delay(attempt), inner.next_delay(attempt));
        }
    }

    #[test]
    fn test_shared_trait_object_delegates() {
        let shared: Arc<dyn BackoffStrategy> =
            Arc::new(ConstantDelay::new(2, Duration::from_millis(7)));
        let capped = MaxRetries::new(Arc::clone(&shared), 0);

        assert!(capped.should_quit(1));
        assert_eq!(capped.next_delay(1), Duration::from_millis(7));
        assert!(!shared.should_quit(1));
    }
}
