#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry fallible operations until they succeed, satisfy a condition, or a
//! strategy gives up.
//!
//! `rebound` wraps the engine from `rebound-core` in a fluent surface:
//!
//! - [`retry`] starts a session builder around an operation
//! - [`Retry`] configures strategy, listeners and error kinds, then runs
//!   the operation blocking ([`Retry::run_until`]) or async
//!   ([`Retry::run_until_async`])
//! - [`defaults`] holds the process-wide configuration every new builder
//!   starts from
//!
//! # Examples
//!
//! ```rust
//! use rebound::prelude::*;
//! use std::time::Duration;
//!
//! let mut calls = 0;
//! let value = retry(|| {
//!     calls += 1;
//!     if calls < 3 {
//!         Err(std::io::Error::other("transient"))
//!     } else {
//!         Ok(calls)
//!     }
//! })
//! .with_strategy(ConstantDelay::new(5, Duration::from_millis(1)))
//! .run_now()
//! .unwrap();
//!
//! assert_eq!(value, 3);
//! ```
//!
//! Async operations use the `_async` runners:
//!
//! ```rust
//! use rebound::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), RetryError<std::io::Error>> {
//! let status = retry(|| async { Ok::<_, std::io::Error>("ready") })
//!     .with_strategy(ExponentialDelay::new(2.0, 4, Duration::from_millis(50)))
//!     .run_until_async(|status| *status == "ready")
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod defaults;
pub mod listeners;

pub use builder::{Retry, retry};

// Re-export the core so applications only depend on this crate.
pub use rebound_core::{
    BackoffStrategy, ConfigError, ConstantDelay, Defaults, DelayBounds, ErrorKind,
    ExponentialDelay, FailureListener, InfiniteRetries, KindSet, LinearDelay, ListenerError,
    MaxRetries, ProgressiveDelay, RetryError, SessionConfig, StrategyConfig, Tunables,
};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use rebound::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builder::{Retry, retry};
    pub use rebound_core::prelude::*;
}
