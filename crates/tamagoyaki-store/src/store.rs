//! Storage contract.

use chrono::{DateTime, NaiveDate, Utc};
use tamagoyaki_aggregate::Candle;
use tamagoyaki_types::day_bounds;

use crate::{Result, StoreError};

/// Outcome of a whole-day write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayWrite {
    /// The day had no stored candles; this many were written.
    Inserted(usize),
    /// The day already had at least one stored candle; nothing was written.
    Skipped,
}

/// Aggregate facts about one stored series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSummary {
    /// Number of stored candles.
    pub candles: u64,
    /// Earliest candle timestamp.
    pub first: DateTime<Utc>,
    /// Latest candle timestamp.
    pub last: DateTime<Utc>,
    /// Number of distinct UTC days with at least one candle.
    pub days: u64,
}

/// Persistence used by the ingestion and export pipelines.
///
/// Stores enforce uniqueness of `(exchange, symbol, timestamp)`. Day
/// idempotence is whole-day: a day with any stored candle counts as present.
pub trait CandleStore {
    /// Returns true if any candle of the series lies within `day` (UTC).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn day_exists(&self, exchange: &str, symbol: &str, day: NaiveDate) -> Result<bool>;

    /// Writes candles unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if a candle's key is already stored;
    /// no candle of the call is written in that case.
    fn insert_all(&mut self, candles: &[Candle]) -> Result<usize>;

    /// Writes a day's candles unless the day is already present.
    ///
    /// The existence check and the write happen atomically, so a day is
    /// either fully written or untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OutsideDay`] if a candle belongs to another
    /// series or day, or any storage error.
    fn insert_day(
        &mut self,
        exchange: &str,
        symbol: &str,
        day: NaiveDate,
        candles: &[Candle],
    ) -> Result<DayWrite>;

    /// Returns the series' candles with `from <= timestamp < to`, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or holds corrupt rows.
    fn query_range(
        &self,
        exchange: &str,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>>;

    /// Deletes every candle of the series within `day`, returning how many.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete_day(&mut self, exchange: &str, symbol: &str, day: NaiveDate) -> Result<usize>;

    /// Returns count and span of the stored series, or `None` if empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn summary(&self, exchange: &str, symbol: &str) -> Result<Option<SeriesSummary>>;
}

/// Verifies that every candle belongs to the given series and day.
///
/// # Errors
///
/// Returns [`StoreError::OutsideDay`] for the first candle that does not.
pub fn check_day(exchange: &str, symbol: &str, day: NaiveDate, candles: &[Candle]) -> Result<()> {
    let (from, to) = day_bounds(day);
    candles
        .iter()
        .find(|c| {
            c.exchange != exchange || c.symbol != symbol || c.timestamp < from || c.timestamp >= to
        })
        .map_or(Ok(()), |c| {
            Err(StoreError::OutsideDay {
                exchange: c.exchange.clone(),
                symbol: c.symbol.clone(),
                timestamp: c.timestamp,
                day,
            })
        })
}
