//! Configuration for retry sessions.
//!
//! - [`Tunables`] - base delay and retry bound used by strategies built
//!   without explicit values
//! - [`Defaults`] - the snapshot every session starts from
//! - [`SessionConfig`] - one session's strategy, kind sets and listeners
//! - [`StrategyConfig`] - serde-friendly description of a built-in strategy

use crate::classify::{ErrorKind, KindSet};
use crate::error::{ConfigError, Result};
use crate::listener::{FailureListener, Listeners};
use crate::strategy::{
    BackoffStrategy, ConstantDelay, DEFAULT_DELAY, DEFAULT_INFINITE_SLEEP, DEFAULT_MAX_RETRIES,
    ExponentialDelay, InfiniteRetries, LinearDelay, MaxRetries, ProgressiveDelay,
};
use serde::{Deserialize, Serialize};
use std::env::VarError;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable overriding the base delay, in milliseconds.
pub const ENV_DELAY_MS: &str = "REBOUND_DELAY_MS";

/// Environment variable overriding the retry bound.
pub const ENV_MAX_RETRIES: &str = "REBOUND_MAX_RETRIES";

/// Base delay and retry bound for strategies built without explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tunables {
    /// Base delay between attempts
    pub delay: Duration,

    /// Maximum number of retries after the first attempt
    pub max_retries: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Tunables {
    /// Load tunables from environment variables.
    ///
    /// This will look for:
    /// - `REBOUND_DELAY_MS` for the base delay (in milliseconds)
    /// - `REBOUND_MAX_RETRIES` for the retry bound
    ///
    /// Unset variables keep the built-in defaults; unparsable or non-UTF-8
    /// values are an error.
    pub fn from_env() -> Result<Self> {
        let mut tunables = Self::default();

        if let Some(delay_ms) = env_u64(ENV_DELAY_MS)? {
            tunables.delay = Duration::from_millis(delay_ms);
        }

        if let Some(max_retries) = env_u64(ENV_MAX_RETRIES)? {
            tunables.max_retries = max_retries;
        }

        Ok(tunables)
    }
}

fn env_u64(var: &'static str) -> Result<Option<u64>> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidEnv {
            var,
            value: raw.to_string_lossy().into_owned(),
        }),
    }
}

/// The configuration every new session is cloned from.
///
/// A `Defaults` value is immutable once shared: the process-wide store in
/// the `rebound` crate swaps whole snapshots, so a session built from one
/// snapshot never observes later changes.
#[derive(Debug, Clone)]
pub struct Defaults {
    strategy: Arc<dyn BackoffStrategy>,
    listeners: Listeners,
    retry_on: KindSet,
    abort_on: KindSet,
    tunables: Tunables,
}

impl Default for Defaults {
    /// Constant 1s delay, 30 retries, no listeners, empty kind sets.
    fn default() -> Self {
        Self::from_tunables(Tunables::default())
    }
}

impl Defaults {
    /// Built-in defaults with a constant strategy derived from `tunables`.
    pub fn from_tunables(tunables: Tunables) -> Self {
        Self {
            strategy: Arc::new(ConstantDelay::from_tunables(&tunables)),
            listeners: Listeners::new(),
            retry_on: KindSet::new(),
            abort_on: KindSet::new(),
            tunables,
        }
    }

    /// Default strategy.
    pub fn strategy(&self) -> &Arc<dyn BackoffStrategy> {
        &self.strategy
    }

    /// Default listeners, notified before session listeners.
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Default retry set.
    pub fn retry_on(&self) -> &KindSet {
        &self.retry_on
    }

    /// Default abort set.
    pub fn abort_on(&self) -> &KindSet {
        &self.abort_on
    }

    /// Default tunables.
    pub fn tunables(&self) -> Tunables {
        self.tunables
    }

    /// Replace the default strategy.
    pub fn set_strategy(&mut self, strategy: Arc<dyn BackoffStrategy>) {
        self.strategy = strategy;
    }

    /// Replace all default listeners with `listener`.
    pub fn set_listener(&mut self, listener: FailureListener) {
        self.listeners.clear();
        self.listeners.push(listener);
    }

    /// Append a default listener.
    pub fn add_listener(&mut self, listener: FailureListener) {
        self.listeners.push(listener);
    }

    /// Add a kind to the default retry set.
    pub fn add_retry_kind(&mut self, kind: ErrorKind) -> bool {
        self.retry_on.insert(kind)
    }

    /// Remove a kind from the default retry set.
    pub fn remove_retry_kind(&mut self, kind: &ErrorKind) -> bool {
        self.retry_on.remove(kind)
    }

    /// Empty the default retry set.
    pub fn clear_retry_kinds(&mut self) {
        self.retry_on.clear();
    }

    /// Add a kind to the default abort set.
    pub fn add_abort_kind(&mut self, kind: ErrorKind) -> bool {
        self.abort_on.insert(kind)
    }

    /// Replace the tunables. The current default strategy is left untouched.
    pub fn set_tunables(&mut self, tunables: Tunables) {
        self.tunables = tunables;
    }
}

/// Configuration owned by one retry session.
///
/// Built from a [`Defaults`] snapshot, then adjusted by the caller before the
/// session starts. A running [`Session`](crate::Session) owns its
/// configuration and never changes it.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    strategy: Arc<dyn BackoffStrategy>,
    retry_limit: Option<u64>,
    listeners: Listeners,
    retry_on: KindSet,
    abort_on: KindSet,
}

impl SessionConfig {
    /// Configuration with `strategy`, empty kind sets and no listeners.
    pub fn new(strategy: impl BackoffStrategy + 'static) -> Self {
        Self {
            strategy: Arc::new(strategy),
            retry_limit: None,
            listeners: Listeners::new(),
            retry_on: KindSet::new(),
            abort_on: KindSet::new(),
        }
    }

    /// Clone a defaults snapshot.
    pub fn from_defaults(defaults: &Defaults) -> Self {
        Self {
            strategy: Arc::clone(&defaults.strategy),
            retry_limit: None,
            listeners: defaults.listeners.clone(),
            retry_on: defaults.retry_on.clone(),
            abort_on: defaults.abort_on.clone(),
        }
    }

    /// Replace the strategy.
    pub fn replace_strategy(&mut self, strategy: Arc<dyn BackoffStrategy>) {
        self.strategy = strategy;
    }

    /// Cap the session at `max_retries` retries, whatever the strategy.
    pub fn limit_retries(&mut self, max_retries: u64) {
        self.retry_limit = Some(max_retries);
    }

    /// Append a listener after the ones already registered.
    pub fn append_listener(&mut self, listener: FailureListener) {
        self.listeners.push(listener);
    }

    /// Add a kind to the retry set.
    pub fn add_retry_kind(&mut self, kind: ErrorKind) -> bool {
        self.retry_on.insert(kind)
    }

    /// Add a kind to the abort set.
    pub fn add_abort_kind(&mut self, kind: ErrorKind) -> bool {
        self.abort_on.insert(kind)
    }

    /// Strategy as configured, without the retry cap.
    pub fn strategy(&self) -> &Arc<dyn BackoffStrategy> {
        &self.strategy
    }

    /// Strategy the engine runs: the configured one, capped when
    /// [`limit_retries`](Self::limit_retries) was called.
    pub fn effective_strategy(&self) -> Arc<dyn BackoffStrategy> {
        match self.retry_limit {
            Some(max_retries) => Arc::new(MaxRetries::new(Arc::clone(&self.strategy), max_retries)),
            None => Arc::clone(&self.strategy),
        }
    }

    /// Retry cap, if any.
    pub fn retry_limit(&self) -> Option<u64> {
        self.retry_limit
    }

    /// Listeners, default ones first.
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Retry set.
    pub fn retry_on(&self) -> &KindSet {
        &self.retry_on
    }

    /// Abort set.
    pub fn abort_on(&self) -> &KindSet {
        &self.abort_on
    }
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY.as_millis() as u64
}

fn default_max_retries() -> u64 {
    DEFAULT_MAX_RETRIES
}

fn default_sleep_ms() -> u64 {
    DEFAULT_INFINITE_SLEEP.as_millis() as u64
}

/// Serializable description of a built-in strategy.
///
/// Missing fields take the built-in defaults (1000ms delay, 30 retries,
/// 30000ms infinite sleep).
///
/// # Examples
///
/// ```rust
/// use rebound_core::config::StrategyConfig;
/// use std::time::Duration;
///
/// let config: StrategyConfig = serde_json::from_str(
///     r#"{ "kind": "exponential", "scale_factor": 2.0, "delay_ms": 2, "max_retries": 10 }"#,
/// ).unwrap();
///
/// let strategy = config.build().unwrap();
/// assert_eq!(strategy.next_delay(10), Duration::from_millis(1024));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// [`ConstantDelay`]
    Constant {
        /// Delay in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        /// Retry bound
        #[serde(default = "default_max_retries")]
        max_retries: u64,
    },
    /// [`LinearDelay`]
    Linear {
        /// Milliseconds added per retry
        scale_factor: f64,
        /// Base delay in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        /// Retry bound
        #[serde(default = "default_max_retries")]
        max_retries: u64,
    },
    /// [`ExponentialDelay`]
    Exponential {
        /// Multiplier per retry
        scale_factor: f64,
        /// Base delay in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        /// Retry bound
        #[serde(default = "default_max_retries")]
        max_retries: u64,
    },
    /// [`ProgressiveDelay`]
    Progressive {
        /// Multiple of the base delay added per retry
        scale_factor: f64,
        /// Base delay in milliseconds
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        /// Retry bound
        #[serde(default = "default_max_retries")]
        max_retries: u64,
    },
    /// [`InfiniteRetries`]
    Infinite {
        /// Sleep in milliseconds
        #[serde(default = "default_sleep_ms")]
        sleep_ms: u64,
    },
}

impl StrategyConfig {
    /// Build the described strategy.
    ///
    /// Fails with [`ConfigError::InvalidScaleFactor`] when the scale factor is
    /// NaN or infinite.
    pub fn build(&self) -> Result<Arc<dyn BackoffStrategy>> {
        let strategy: Arc<dyn BackoffStrategy> = match *self {
            Self::Constant {
                delay_ms,
                max_retries,
            } => Arc::new(ConstantDelay::new(max_retries, Duration::from_millis(delay_ms))),
            Self::Linear {
                scale_factor,
                delay_ms,
                max_retries,
            } => Arc::new(LinearDelay::new(
                finite(scale_factor)?,
                max_retries,
                Duration::from_millis(delay_ms),
            )),
            Self::Exponential {
                scale_factor,
                delay_ms,
                max_retries,
            } => Arc::new(ExponentialDelay::new(
                finite(scale_factor)?,
                max_retries,
                Duration::from_millis(delay_ms),
            )),
            Self::Progressive {
                scale_factor,
                delay_ms,
                max_retries,
            } => Arc::new(ProgressiveDelay::new(
                finite(scale_factor)?,
                max_retries,
                Duration::from_millis(delay_ms),
            )),
            Self::Infinite { sleep_ms } => {
                Arc::new(InfiniteRetries::new(Duration::from_millis(sleep_ms)))
            }
        };
        Ok(strategy)
    }
}

fn finite(scale_factor: f64) -> Result<f64> {
    if scale_factor.is_finite() {
        Ok(scale_factor)
    } else {
        Err(ConfigError::InvalidScaleFactor(scale_factor))
    }
}
