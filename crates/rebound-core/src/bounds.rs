//! Overflow-safe conversion of raw millisecond delays into [`Duration`]s.

use crate::error::{ConfigError, Result};
use std::time::Duration;

const NANOS_PER_MILLI: f64 = 1_000_000.0;
const MILLIS_PER_SEC: f64 = 1_000.0;

/// Inclusive range a computed delay is clamped into.
///
/// The default range is `[1ms, Duration::MAX]`: the lower bound keeps a
/// retry loop from spinning, the upper bound is the largest representable
/// duration.
///
/// # Examples
///
/// ```rust
/// use rebound_core::DelayBounds;
/// use std::time::Duration;
///
/// let bounds = DelayBounds::default();
/// assert_eq!(bounds.clamp_millis(0.0), Duration::from_millis(1));
/// assert_eq!(bounds.clamp_millis(250.0), Duration::from_millis(250));
/// assert_eq!(bounds.clamp_millis(f64::INFINITY), Duration::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayBounds {
    min: Duration,
    max: Duration,
}

impl DelayBounds {
    /// Smallest delay any built-in strategy will produce.
    pub const MIN_DELAY: Duration = Duration::from_millis(1);

    /// Create bounds, rejecting a lower bound above the upper bound.
    pub fn new(min: Duration, max: Duration) -> Result<Self> {
        if min > max {
            return Err(ConfigError::InvalidBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    pub fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Convert a raw millisecond value into a bounded duration.
    ///
    /// NaN and non-positive values map to the lower bound. Values too large
    /// for a [`Duration`] (including infinity) saturate to `Duration::MAX`
    /// before the upper bound is applied.
    pub fn clamp_millis(&self, raw_millis: f64) -> Duration {
        if raw_millis.is_nan() || raw_millis <= 0.0 {
            return self.min;
        }
        millis_to_duration(raw_millis).clamp(self.min, self.max)
    }

    /// Clamp an existing duration into the bounds.
    pub fn clamp(&self, delay: Duration) -> Duration {
        delay.clamp(self.min, self.max)
    }
}

impl Default for DelayBounds {
    fn default() -> Self {
        Self {
            min: Self::MIN_DELAY,
            max: Duration::MAX,
        }
    }
}

/// Bound a raw millisecond delay into `[1ms, Duration::MAX]`.
pub fn bounded_millis(raw_millis: f64) -> Duration {
    DelayBounds::default().clamp_millis(raw_millis)
}

// Splits into whole seconds plus a sub-second remainder so integral
// millisecond values convert exactly.
fn millis_to_duration(millis: f64) -> Duration {
    let secs = (millis / MILLIS_PER_SEC).trunc();
    if !secs.is_finite() || secs >= u64::MAX as f64 {
        return Duration::MAX;
    }

    let remainder_millis = (millis - secs * MILLIS_PER_SEC).max(0.0);
    let nanos = (remainder_millis * NANOS_PER_MILLI).round().min(999_999_999.0);

    Duration::new(secs as u64, nanos as u32)
}
