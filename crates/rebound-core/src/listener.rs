//! Failure listeners notified for every caught operation error.

use crate::error::ListenerError;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with each caught error and the attempt that raised it.
///
/// Returning an error aborts the session with
/// [`RetryError::Listener`](crate::RetryError::Listener).
pub type FailureListener =
    Arc<dyn Fn(&(dyn Error + 'static), u64) -> Result<(), ListenerError> + Send + Sync>;

/// Wrap a closure as a [`FailureListener`].
///
/// # Examples
///
/// ```rust
/// use rebound_core::listener::failure_listener;
///
/// let listener = failure_listener(|err, attempt| {
///     eprintln!("attempt {attempt} failed: {err}");
///     Ok(())
/// });
/// # let _ = listener;
/// ```
pub fn failure_listener<F>(listener: F) -> FailureListener
where
    F: Fn(&(dyn Error + 'static), u64) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    Arc::new(listener)
}

/// Ordered list of failure listeners.
///
/// Listeners run synchronously, in registration order. The first listener
/// error stops the fan-out and is returned to the engine.
#[derive(Clone, Default)]
pub struct Listeners {
    listeners: Vec<FailureListener>,
}

impl Listeners {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener.
    pub fn push(&mut self, listener: FailureListener) {
        self.listeners.push(listener);
    }

    /// Append every listener of `other`, keeping their order.
    pub fn extend_from(&mut self, other: &Listeners) {
        self.listeners.extend(other.listeners.iter().cloned());
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener of `error`, stopping at the first listener error.
    pub fn notify(&self, error: &(dyn Error + 'static), attempt: u64) -> Result<(), ListenerError> {
        for listener in &self.listeners {
            listener(error, attempt)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}
