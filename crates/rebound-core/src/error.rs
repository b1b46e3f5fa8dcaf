//! Error types for configuration and retry sessions.

use std::time::Duration;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Error returned by a failure listener.
///
/// Listener errors are never retried: they terminate the session and surface
/// as [`RetryError::Listener`].
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building a retry configuration.
///
/// These are programming or deployment mistakes. They are reported before a
/// session starts and never enter the retry loop.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The lower delay bound is greater than the upper bound.
    #[error("invalid delay bounds: minimum {min:?} is greater than maximum {max:?}")]
    InvalidBounds {
        /// Requested lower bound
        min: Duration,
        /// Requested upper bound
        max: Duration,
    },

    /// A scale factor was NaN or infinite.
    #[error("invalid scale factor: {0}")]
    InvalidScaleFactor(f64),

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Raw value found in the environment
        value: String,
    },
}

/// Terminal error of a retry session.
///
/// Callers see either the successful value, the operation's own error
/// (wrapped in [`Aborted`](Self::Aborted) or [`Exhausted`](Self::Exhausted)),
/// a [`ConditionNotMet`](Self::ConditionNotMet) error when the success
/// predicate never held, or a listener failure.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The error was classified as not retryable and surfaced on the attempt
    /// that raised it.
    #[error("attempt failed with a non-retryable error: {0}")]
    Aborted(#[source] E),

    /// The strategy gave up while the operation was still failing.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    Exhausted {
        /// Number of invocations made
        attempts: u64,
        /// Error raised by the last invocation
        #[source]
        source: E,
    },

    /// The operation kept succeeding but the success predicate never held.
    #[error("retries exhausted after {attempts} attempts without satisfying the success condition")]
    ConditionNotMet {
        /// Number of invocations made
        attempts: u64,
    },

    /// A failure listener returned an error.
    #[error("failure listener error: {0}")]
    Listener(#[source] ListenerError),
}

impl<E> RetryError<E> {
    /// Borrow the operation error, if this session ended with one.
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            Self::Aborted(err) | Self::Exhausted { source: err, .. } => Some(err),
            Self::ConditionNotMet { .. } | Self::Listener(_) => None,
        }
    }

    /// Recover the operation error unchanged, if this session ended with one.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            Self::Aborted(err) | Self::Exhausted { source: err, .. } => Some(err),
            Self::ConditionNotMet { .. } | Self::Listener(_) => None,
        }
    }

    /// Whether the session ended because the strategy signalled quit.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. } | Self::ConditionNotMet { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_operation_error_is_recovered_verbatim() {
        let err: RetryError<io::Error> = RetryError::Exhausted {
            attempts: 4,
            source: io::Error::new(io::ErrorKind::TimedOut, "slow"),
        };

        assert!(err.is_exhausted());
        assert_eq!(err.operation_error().map(io::Error::kind), Some(io::ErrorKind::TimedOut));

        let inner = err.into_operation_error().unwrap();
        assert_eq!(inner.to_string(), "slow");
    }

    #[test]
    fn test_condition_not_met_has_no_cause() {
        let err: RetryError<io::Error> = RetryError::ConditionNotMet { attempts: 7 };

        assert!(err.is_exhausted());
        assert!(err.source().is_none());
        assert!(err.operation_error().is_none());
        assert!(err.to_string().contains("7 attempts"));
    }

    #[test]
    fn test_aborted_is_not_exhausted() {
        let err = RetryError::Aborted(io::Error::other("denied"));

        assert!(!err.is_exhausted());
        assert_eq!(err.source().unwrap().to_string(), "denied");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidBounds {
            min: Duration::from_secs(2),
            max: Duration::from_secs(1),
        };
        assert_eq!(
            err.to_string(),
            "invalid delay bounds: minimum 2s is greater than maximum 1s"
        );
    }
}
