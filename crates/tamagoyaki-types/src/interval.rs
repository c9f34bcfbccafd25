//! Candle aggregation interval.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;

const MINUTE: u32 = 60;
const HOUR: u32 = 60 * MINUTE;
const DAY: u32 = 24 * HOUR;

/// Fixed candle length in whole seconds, always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Interval(NonZeroU32);

impl Interval {
    /// One second.
    pub const SECOND: Self = Self(NonZeroU32::MIN);
    /// One minute.
    pub const MINUTE: Self = Self::from_const(MINUTE);
    /// One hour.
    pub const HOUR: Self = Self::from_const(HOUR);
    /// One day.
    pub const DAY: Self = Self::from_const(DAY);

    const fn from_const(secs: u32) -> Self {
        match NonZeroU32::new(secs) {
            Some(n) => Self(n),
            None => Self::SECOND,
        }
    }

    /// Creates an interval from a number of seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if `secs` is zero, negative, or does not fit in 32 bits.
    pub fn from_secs(secs: i64) -> Result<Self, IntervalError> {
        if secs <= 0 {
            return Err(IntervalError::NonPositive(secs));
        }
        let secs = u32::try_from(secs).map_err(|_| IntervalError::TooLarge(secs))?;
        NonZeroU32::new(secs)
            .map(Self)
            .ok_or(IntervalError::NonPositive(0))
    }

    /// Returns the interval length in seconds.
    #[must_use]
    pub const fn secs(&self) -> i64 {
        self.0.get() as i64
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::SECOND
    }
}

impl TryFrom<i64> for Interval {
    type Error = IntervalError;

    fn try_from(secs: i64) -> Result<Self, Self::Error> {
        Self::from_secs(secs)
    }
}

impl From<Interval> for i64 {
    fn from(interval: Interval) -> Self {
        interval.secs()
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.0.get();
        if secs % DAY == 0 {
            write!(f, "{}d", secs / DAY)
        } else if secs % HOUR == 0 {
            write!(f, "{}h", secs / HOUR)
        } else if secs % MINUTE == 0 {
            write!(f, "{}m", secs / MINUTE)
        } else {
            write!(f, "{secs}s")
        }
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.is_empty() {
            return Err(IntervalError::Invalid(s.to_string()));
        }

        // Plain number of seconds.
        if let Ok(secs) = lower.parse::<i64>() {
            return Self::from_secs(secs);
        }

        let (count, unit) = split_count_and_unit(&lower).ok_or_else(|| IntervalError::Invalid(s.to_string()))?;
        let multiplier = match unit {
            "s" | "sec" | "second" | "seconds" => 1,
            "m" | "min" | "minute" | "minutes" => i64::from(MINUTE),
            "h" | "hour" | "hours" => i64::from(HOUR),
            "d" | "day" | "days" | "daily" => i64::from(DAY),
            _ => return Err(IntervalError::Invalid(s.to_string())),
        };
        Self::from_secs(count.saturating_mul(multiplier))
    }
}

/// Splits `"5m"` into `(5, "m")` and the timeframe alias `"m5"` into `(5, "m")`.
///
/// A unit with no count (`"minute"`) means a count of one.
fn split_count_and_unit(s: &str) -> Option<(i64, &str)> {
    let digits_end = s.find(|c: char| !c.is_ascii_digit() && c != '-').unwrap_or(s.len());
    if digits_end > 0 {
        let count = s[..digits_end].parse().ok()?;
        return Some((count, &s[digits_end..]));
    }

    let unit_end = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
    let unit = &s[..unit_end];
    let count = if unit_end == s.len() {
        1
    } else {
        s[unit_end..].parse().ok()?
    };
    Some((count, unit))
}

/// Errors for invalid aggregation intervals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// Zero or negative length.
    #[error("Interval must be a positive number of seconds, got {0}")]
    NonPositive(i64),

    /// Length does not fit the supported range.
    #[error("Interval of {0} seconds is too large")]
    TooLarge(i64),

    /// Unrecognised interval string.
    #[error("Invalid interval '{0}', expected seconds (60) or a unit form (30s, 5m, 1h, 1d)")]
    Invalid(String),
}
