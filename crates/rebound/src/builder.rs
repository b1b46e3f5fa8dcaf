//! Fluent session builder.

use crate::defaults;
use rebound_core::listener::failure_listener;
use rebound_core::{BackoffStrategy, ErrorKind, ListenerError, RetryError, Session, SessionConfig};
use std::error::Error;
use std::future::Future;
use std::sync::Arc;

/// Start configuring a retry session around `operation`.
///
/// The session starts from a snapshot of the process-wide
/// [`defaults`](crate::defaults) taken now; later changes to the defaults do
/// not affect it.
///
/// `operation` is either a blocking closure returning `Result<T, E>` or a
/// closure returning a future of `Result<T, E>`. Nothing runs until one of the
/// `run_*` methods is called.
pub fn retry<F>(operation: F) -> Retry<F> {
    Retry {
        operation,
        config: SessionConfig::from_defaults(&defaults::snapshot()),
    }
}

/// Builder for a single retry session.
///
/// Every method consumes and returns the builder, so configuration reads as a
/// chain ending in a `run_*` call.
///
/// # Examples
///
/// ```rust
/// use rebound::prelude::*;
/// use std::time::Duration;
///
/// let result: Result<(), RetryError<std::io::Error>> = retry(|| {
///     Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
/// })
/// .with_strategy(ConstantDelay::new(3, Duration::from_millis(1)))
/// .abort_on(ErrorKind::matching("permission denied", |err| {
///     err.downcast_ref::<std::io::Error>()
///         .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
/// }))
/// .run_now();
///
/// assert!(matches!(result, Err(RetryError::Aborted(_))));
/// ```
#[derive(Debug)]
#[must_use = "a retry session does nothing until one of the run methods is called"]
pub struct Retry<F> {
    operation: F,
    config: SessionConfig,
}

impl<F> Retry<F> {
    /// Replace the strategy.
    ///
    /// A cap set with [`max_retries`](Self::max_retries) still applies.
    pub fn with_strategy(mut self, strategy: impl BackoffStrategy + 'static) -> Self {
        self.config.replace_strategy(Arc::new(strategy));
        self
    }

    /// Replace the strategy with a shared one.
    pub fn with_shared_strategy(mut self, strategy: Arc<dyn BackoffStrategy>) -> Self {
        self.config.replace_strategy(strategy);
        self
    }

    /// Append a failure listener, notified after the default listeners.
    ///
    /// Returning an error from the listener ends the session with
    /// [`RetryError::Listener`].
    pub fn on_failure<L>(mut self, listener: L) -> Self
    where
        L: Fn(&(dyn Error + 'static), u64) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.config.append_listener(failure_listener(listener));
        self
    }

    /// Retry only errors matching `kind` (or another kind in the retry set).
    pub fn retry_on(mut self, kind: ErrorKind) -> Self {
        self.config.add_retry_kind(kind);
        self
    }

    /// Abort immediately on errors matching `kind`.
    ///
    /// The abort set wins over the retry set.
    pub fn abort_on(mut self, kind: ErrorKind) -> Self {
        self.config.add_abort_kind(kind);
        self
    }

    /// Cap the session at `max_retries` retries, whatever the strategy says.
    pub fn max_retries(mut self, max_retries: u64) -> Self {
        self.config.limit_retries(max_retries);
        self
    }

    /// The configuration the session will run with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run a blocking operation until `satisfied` accepts its value.
    ///
    /// # Returns
    /// - `Ok(T)`: The first accepted value
    /// - `Err(RetryError::Aborted)`: A non-retryable error
    /// - `Err(RetryError::Exhausted)`: The strategy gave up after an error
    /// - `Err(RetryError::ConditionNotMet)`: The strategy gave up after unaccepted values
    /// - `Err(RetryError::Listener)`: A failure listener returned an error
    pub fn run_until<T, E, P>(self, satisfied: P) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        P: FnMut(&T) -> bool,
        E: Error + 'static,
    {
        Session::new(self.config).run_blocking(self.operation, satisfied)
    }

    /// Run a blocking operation until it returns `Ok`.
    pub fn run_now<T, E>(self) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: Error + 'static,
    {
        self.run_until(|_| true)
    }

    /// Run an async operation until `satisfied` accepts its value.
    ///
    /// Delays use `tokio::time::sleep`, so this must be polled inside a Tokio
    /// runtime. Dropping the future cancels the session.
    pub async fn run_until_async<Fut, T, E, P>(self, satisfied: P) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&T) -> bool,
        E: Error + 'static,
    {
        Session::new(self.config)
            .run_async(self.operation, satisfied)
            .await
    }

    /// Run an async operation until it returns `Ok`.
    pub async fn run_now_async<Fut, T, E>(self) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
    {
        self.run_until_async(|_| true).await
    }
}
