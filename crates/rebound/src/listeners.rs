//! Ready-made failure listeners.

use rebound_core::ListenerError;
use std::error::Error;
use tracing::warn;

/// Listener that logs every caught error at `WARN` level.
///
/// # Examples
///
/// ```rust
/// use rebound::prelude::*;
/// use std::time::Duration;
///
/// let result: Result<(), RetryError<std::io::Error>> =
///     retry(|| Err(std::io::Error::other("connection reset")))
///         .with_strategy(ConstantDelay::new(1, Duration::from_millis(1)))
///         .on_failure(rebound::listeners::log_failures())
///         .run_now();
///
/// assert!(result.is_err());
/// ```
pub fn log_failures()
-> impl Fn(&(dyn Error + 'static), u64) -> Result<(), ListenerError> + Send + Sync + 'static {
    |error: &(dyn Error + 'static), attempt: u64| {
        warn!(attempt, error = %error, "attempt failed");
        Ok(())
    }
}
