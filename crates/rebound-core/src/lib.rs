#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the rebound retry library.
//!
//! This crate holds everything that decides *how* an operation is retried:
//!
//! - **Delay bounding** via [`DelayBounds`] - every computed delay is clamped
//!   into `[1ms, Duration::MAX]` without overflow
//! - **Backoff strategies** via the [`BackoffStrategy`] trait
//!   - Constant, linear, exponential and progressive delays
//!   - Infinite retries with a fixed sleep
//!   - A [`MaxRetries`] adapter that caps any strategy
//! - **Error classification** via [`ErrorKind`] and [`should_retry`]
//! - **Failure listeners** notified once per caught error
//! - **The retry engine** ([`Session`]) shared by blocking and async runners
//!
//! The fluent `retry(...)` surface and process-wide defaults live in the
//! `rebound` facade crate.
//!
//! # Examples
//!
//! ```rust
//! use rebound_core::prelude::*;
//! use std::time::Duration;
//!
//! let config = SessionConfig::new(ConstantDelay::new(3, Duration::from_millis(1)));
//!
//! let mut calls = 0;
//! let result = Session::new(config).run_blocking(
//!     || {
//!         calls += 1;
//!         if calls < 3 {
//!             Err(std::io::Error::other("transient"))
//!         } else {
//!             Ok(calls)
//!         }
//!     },
//!     |_| true,
//! );
//!
//! assert_eq!(result.unwrap(), 3);
//! ```

pub mod bounds;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod listener;
pub mod strategy;

pub use bounds::{DelayBounds, bounded_millis};
pub use classify::{ErrorKind, KindSet, should_retry};
pub use config::{Defaults, SessionConfig, StrategyConfig, Tunables};
pub use engine::Session;
pub use error::{ConfigError, ListenerError, Result, RetryError};
pub use listener::{FailureListener, Listeners, failure_listener};
pub use strategy::{
    BackoffStrategy, ConstantDelay, ExponentialDelay, InfiniteRetries, LinearDelay, MaxRetries,
    ProgressiveDelay,
};

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use rebound_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::classify::{ErrorKind, KindSet};
    pub use crate::config::{Defaults, SessionConfig, StrategyConfig, Tunables};
    pub use crate::engine::Session;
    pub use crate::error::{ConfigError, ListenerError, RetryError};
    pub use crate::strategy::{
        BackoffStrategy, ConstantDelay, ExponentialDelay, InfiniteRetries, LinearDelay,
        MaxRetries, ProgressiveDelay,
    };
}
