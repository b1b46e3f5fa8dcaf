//! Process-wide retry defaults.
//!
//! Every builder returned by [`retry`](crate::retry) starts from a snapshot of
//! these defaults. Updates swap in a new snapshot, so sessions that already
//! started keep the configuration they were built with.
//!
//! Built-in defaults: a [`ConstantDelay`] of 1s with 30 retries, no
//! listeners, empty retry and abort sets.
//!
//! # Examples
//!
//! ```rust
//! use rebound::defaults;
//! use rebound::prelude::*;
//! use std::time::Duration;
//!
//! defaults::set_default_strategy(ExponentialDelay::new(2.0, 5, Duration::from_millis(100)));
//! defaults::add_default_retry_kind(ErrorKind::of::<std::io::Error>());
//! defaults::add_default_listener(rebound::listeners::log_failures());
//!
//! // ... sessions created from here on use the new defaults ...
//!
//! defaults::reset_defaults();
//! ```

use rebound_core::listener::failure_listener;
use rebound_core::{
    BackoffStrategy, ConfigError, ConstantDelay, Defaults, ErrorKind, ExponentialDelay,
    LinearDelay, ListenerError, ProgressiveDelay, StrategyConfig, Tunables,
};
use std::error::Error;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

static DEFAULTS: LazyLock<Mutex<Arc<Defaults>>> =
    LazyLock::new(|| Mutex::new(Arc::new(Defaults::default())));

fn lock() -> MutexGuard<'static, Arc<Defaults>> {
    // Updates never panic mid-write, so a poisoned snapshot is still whole.
    DEFAULTS.lock().unwrap_or_else(PoisonError::into_inner)
}

fn update<R>(change: impl FnOnce(&mut Defaults) -> R) -> R {
    let mut guard = lock();
    change(Arc::make_mut(&mut guard))
}

/// The current defaults.
pub fn snapshot() -> Arc<Defaults> {
    Arc::clone(&lock())
}

/// Replace the default strategy.
pub fn set_default_strategy(strategy: impl BackoffStrategy + 'static) {
    let strategy: Arc<dyn BackoffStrategy> = Arc::new(strategy);
    debug!(?strategy, "default strategy replaced");
    update(|defaults| defaults.set_strategy(strategy));
}

/// Replace the default strategy with one built from `config`.
///
/// The defaults are left unchanged when `config` is invalid.
pub fn set_default_strategy_config(config: &StrategyConfig) -> Result<(), ConfigError> {
    let strategy = config.build()?;
    debug!(?config, "default strategy replaced from config");
    update(|defaults| defaults.set_strategy(strategy));
    Ok(())
}

/// Replace every default listener with `listener`.
pub fn set_default_listener<L>(listener: L)
where
    L: Fn(&(dyn Error + 'static), u64) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    let listener = failure_listener(listener);
    update(|defaults| defaults.set_listener(listener));
}

/// Append a default listener.
pub fn add_default_listener<L>(listener: L)
where
    L: Fn(&(dyn Error + 'static), u64) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    let listener = failure_listener(listener);
    update(|defaults| defaults.add_listener(listener));
}

/// Add `kind` to the default retry set. Returns `false` if it was already there.
pub fn add_default_retry_kind(kind: ErrorKind) -> bool {
    update(|defaults| defaults.add_retry_kind(kind))
}

/// Remove `kind` from the default retry set. Returns `false` if it was absent.
pub fn remove_default_retry_kind(kind: &ErrorKind) -> bool {
    update(|defaults| defaults.remove_retry_kind(kind))
}

/// Empty the default retry set, so every error not aborted is retried.
pub fn reset_default_retry_kinds() {
    update(Defaults::clear_retry_kinds);
}

/// Add `kind` to the default abort set. Returns `false` if it was already there.
pub fn add_default_abort_kind(kind: ErrorKind) -> bool {
    update(|defaults| defaults.add_abort_kind(kind))
}

/// Set the base delay used by strategies built from the tunables.
///
/// Strategies already installed keep their own delay.
pub fn set_default_delay(delay: Duration) {
    update(|defaults| {
        let tunables = Tunables {
            delay,
            ..defaults.tunables()
        };
        defaults.set_tunables(tunables);
    });
}

/// Set the retry bound used by strategies built from the tunables.
///
/// Strategies already installed keep their own bound.
pub fn set_default_max_retries(max_retries: u64) {
    update(|defaults| {
        let tunables = Tunables {
            max_retries,
            ..defaults.tunables()
        };
        defaults.set_tunables(tunables);
    });
}

/// Current tunables.
pub fn tunables() -> Tunables {
    lock().tunables()
}

/// Restore the built-in defaults.
pub fn reset_defaults() {
    *lock() = Arc::new(Defaults::default());
}

/// Apply `REBOUND_DELAY_MS` and `REBOUND_MAX_RETRIES`.
///
/// Sets the tunables and installs a [`ConstantDelay`] built from them as the
/// default strategy. Listeners and kind sets are kept. On error nothing
/// changes.
pub fn load_env() -> Result<Tunables, ConfigError> {
    let tunables = Tunables::from_env()?;
    info!(
        delay = ?tunables.delay,
        max_retries = tunables.max_retries,
        "loaded retry defaults from environment"
    );
    update(|defaults| {
        defaults.set_tunables(tunables);
        defaults.set_strategy(Arc::new(ConstantDelay::from_tunables(&tunables)));
    });
    Ok(tunables)
}

/// Constant strategy using the current tunables.
pub fn constant() -> ConstantDelay {
    ConstantDelay::from_tunables(&tunables())
}

/// Linear strategy using the current tunables.
pub fn linear(scale_factor: f64) -> LinearDelay {
    LinearDelay::from_tunables(scale_factor, &tunables())
}

/// Exponential strategy using the current tunables.
pub fn exponential(scale_factor: f64) -> ExponentialDelay {
    ExponentialDelay::from_tunables(scale_factor, &tunables())
}

/// Progressive strategy using the current tunables.
pub fn progressive(scale_factor: f64) -> ProgressiveDelay {
    ProgressiveDelay::from_tunables(scale_factor, &tunables())
}
