//! Backoff strategies deciding retry delay and termination.
//!
//! This module provides the [`BackoffStrategy`] trait and its built-in
//! implementations. Strategies are deterministic functions of the attempt
//! number: no jitter, no internal state.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - Core trait for retry strategies
//! - [`ConstantDelay`] - Same delay before every retry
//! - [`LinearDelay`] - Delay grows by a fixed number of milliseconds
//! - [`ExponentialDelay`] - Delay is multiplied on every retry
//! - [`ProgressiveDelay`] - Delay grows by a multiple of the base delay
//! - [`InfiniteRetries`] - Never gives up, sleeps a fixed time
//! - [`MaxRetries`] - Caps any strategy at a number of retries
//!
//! # Examples
//!
//! ```rust
//! use rebound_core::strategy::{BackoffStrategy, ExponentialDelay};
//! use std::time::Duration;
//!
//! let strategy = ExponentialDelay::new(2.0, 5, Duration::from_millis(100));
//!
//! assert_eq!(strategy.next_delay(1), Duration::from_millis(100));
//! assert_eq!(strategy.next_delay(4), Duration::from_millis(800));
//! assert!(!strategy.should_quit(5));
//! assert!(strategy.should_quit(6));
//! ```

mod backoff;
mod constant;
mod exponential;
mod infinite;
mod linear;
mod progressive;

pub use backoff::{BackoffStrategy, MaxRetries};
pub use constant::ConstantDelay;
pub use exponential::ExponentialDelay;
pub use infinite::InfiniteRetries;
pub use linear::LinearDelay;
pub use progressive::ProgressiveDelay;

use std::time::Duration;

/// Base delay used when none is configured: 1 second.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Retry bound used when none is configured: 30 retries.
pub const DEFAULT_MAX_RETRIES: u64 = 30;

/// Sleep used by [`InfiniteRetries::default`]: 30 seconds.
pub const DEFAULT_INFINITE_SLEEP: Duration = Duration::from_secs(30);

/// Base delay in fractional milliseconds.
pub(crate) fn millis(delay: Duration) -> f64 {
    delay.as_nanos() as f64 / 1_000_000.0
}

/// Number of completed retries before `attempt`, treating 0 like 1.
pub(crate) fn retries_before(attempt: u64) -> f64 {
    attempt.saturating_sub(1) as f64
}
