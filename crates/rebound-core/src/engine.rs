//! The retry loop.
//!
//! A [`Session`] is a two-state machine (attempting, terminated) driven one
//! outcome at a time. The transition logic is shared by the blocking runner
//! ([`Session::run_blocking`]) and the async runner ([`Session::run_async`]);
//! they differ only in how they wait and how they invoke the operation.
//!
//! # Transitions
//!
//! For attempt `n` (starting at 1):
//!
//! ```text
//! Ok(v),  predicate(v)          -> Ok(v)
//! Ok(v), !predicate(v), quit(n) -> ConditionNotMet { attempts: n }
//! Ok(v), !predicate(v)          -> wait next_delay(n), n += 1
//! Err(e), listener fails        -> Listener(..)
//! Err(e), not retryable         -> Aborted(e)
//! Err(e), quit(n)               -> Exhausted { attempts: n, source: e }
//! Err(e)                        -> wait next_delay(n), n += 1
//! ```
//!
//! Unsatisfied successes never reach the classifier or the listeners.

use crate::classify::{KindSet, should_retry};
use crate::config::SessionConfig;
use crate::error::RetryError;
use crate::listener::Listeners;
use crate::strategy::BackoffStrategy;
use std::error::Error;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One end-to-end execution of the retry loop.
///
/// Attempts run strictly one after another: attempt `n + 1` starts only after
/// attempt `n` was classified and its delay elapsed.
///
/// # Examples
///
/// ```rust
/// use rebound_core::{ConstantDelay, RetryError, Session, SessionConfig};
/// use std::time::Duration;
///
/// let config = SessionConfig::new(ConstantDelay::new(6, Duration::from_millis(1)));
///
/// let mut calls = 0;
/// let result: Result<u32, RetryError<std::io::Error>> = Session::new(config).run_blocking(
///     || {
///         calls += 1;
///         Ok(calls)
///     },
///     |_| false,
/// );
///
/// assert!(matches!(result, Err(RetryError::ConditionNotMet { attempts: 7 })));
/// assert_eq!(calls, 7);
/// ```
#[derive(Debug)]
pub struct Session {
    strategy: Arc<dyn BackoffStrategy>,
    listeners: Listeners,
    retry_on: KindSet,
    abort_on: KindSet,
    attempt: u64,
}

enum Step<T, E> {
    Finished(Result<T, RetryError<E>>),
    Wait(Duration),
}

impl Session {
    /// Start a session owning `config`.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            strategy: config.effective_strategy(),
            listeners: config.listeners().clone(),
            retry_on: config.retry_on().clone(),
            abort_on: config.abort_on().clone(),
            attempt: 1,
        }
    }

    /// Number of the attempt currently running (or about to run).
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Run a blocking operation, sleeping the current thread between attempts.
    ///
    /// # Returns
    /// - `Ok(T)`: The first value accepted by `satisfied`
    /// - `Err(RetryError<E>)`: See [`RetryError`] for the terminal cases
    pub fn run_blocking<F, P, T, E>(
        mut self,
        mut operation: F,
        mut satisfied: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        P: FnMut(&T) -> bool,
        E: Error + 'static,
    {
        loop {
            match self.step(operation(), &mut satisfied) {
                Step::Finished(result) => return result,
                Step::Wait(delay) => std::thread::sleep(delay),
            }
        }
    }

    /// Run an async operation, suspending on `tokio::time::sleep` between attempts.
    ///
    /// The session is cancelled by dropping the returned future.
    pub async fn run_async<F, Fut, P, T, E>(
        mut self,
        mut operation: F,
        mut satisfied: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: FnMut(&T) -> bool,
        E: Error + 'static,
    {
        loop {
            let outcome = operation().await;
            match self.step(outcome, &mut satisfied) {
                Step::Finished(result) => return result,
                Step::Wait(delay) => tokio::time::sleep(delay).await,
            }
        }
    }

    fn step<T, E, P>(&mut self, outcome: Result<T, E>, satisfied: &mut P) -> Step<T, E>
    where
        P: FnMut(&T) -> bool,
        E: Error + 'static,
    {
        let attempt = self.attempt;

        match outcome {
            Ok(value) => {
                if satisfied(&value) {
                    return Step::Finished(Ok(value));
                }
                if self.strategy.should_quit(attempt) {
                    warn!(attempts = attempt, "success condition never satisfied, giving up");
                    return Step::Finished(Err(RetryError::ConditionNotMet { attempts: attempt }));
                }
            }
            Err(error) => {
                if let Err(listener_error) = self.listeners.notify(&error, attempt) {
                    return Step::Finished(Err(RetryError::Listener(listener_error)));
                }
                if !should_retry(&error, &self.retry_on, &self.abort_on) {
                    debug!(attempt, error = %error, "error is not retryable");
                    return Step::Finished(Err(RetryError::Aborted(error)));
                }
                if self.strategy.should_quit(attempt) {
                    warn!(attempts = attempt, error = %error, "retries exhausted");
                    return Step::Finished(Err(RetryError::Exhausted {
                        attempts: attempt,
                        source: error,
                    }));
                }
            }
        }

        let delay = self.strategy.next_delay(attempt);
        debug!(attempt, ?delay, "retrying after delay");
        self.attempt = attempt.saturating_add(1);
        Step::Wait(delay)
    }
}
