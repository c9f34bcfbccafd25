//! Store error types.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing candles.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A candle with the same natural key is already stored.
    #[error("Duplicate candle {exchange}/{symbol} at {timestamp}")]
    Duplicate {
        /// Exchange of the conflicting candle.
        exchange: String,
        /// Symbol of the conflicting candle.
        symbol: String,
        /// Bucket start of the conflicting candle.
        timestamp: DateTime<Utc>,
    },

    /// A candle passed to a day write does not belong to that day's series.
    #[error("Candle {exchange}/{symbol} at {timestamp} does not belong to {day}")]
    OutsideDay {
        /// Exchange of the offending candle.
        exchange: String,
        /// Symbol of the offending candle.
        symbol: String,
        /// Bucket start of the offending candle.
        timestamp: DateTime<Utc>,
        /// Day being written.
        day: NaiveDate,
    },

    /// A stored value could not be decoded.
    #[error("Corrupt value in column '{column}': {value}")]
    Corrupt {
        /// Column holding the value.
        column: &'static str,
        /// The raw stored value.
        value: String,
    },
}
