//! Error types for tamagoyaki.

use chrono::NaiveDate;
use thiserror::Error;

use crate::IntervalError;

/// Result type alias for tamagoyaki operations.
pub type Result<T> = std::result::Result<T, TamagoyakiError>;

/// Errors that can occur while ingesting, storing, and exporting candles.
#[derive(Error, Debug)]
pub enum TamagoyakiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Gzip decompression failed.
    #[error("Decompression error: {0}")]
    Decompress(String),

    /// Invalid trade data.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid aggregation interval.
    #[error(transparent)]
    Interval(#[from] IntervalError),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Date argument not in `YYYYMMDD` form.
    #[error("Invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },
}
