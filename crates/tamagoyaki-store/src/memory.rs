//! In-memory candle store.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tamagoyaki_aggregate::Candle;
use tamagoyaki_types::day_bounds;

use crate::{CandleStore, DayWrite, Result, SeriesSummary, StoreError, check_day};

type Key = (String, String, i64);

/// Candle store kept entirely in memory.
///
/// Follows the same uniqueness and whole-day rules as
/// [`SqliteStore`](crate::SqliteStore). Useful in tests and for one-shot
/// pipelines that never touch disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    candles: BTreeMap<Key, Candle>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            candles: BTreeMap::new(),
        }
    }

    /// Returns the number of stored candles across all series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    fn key(candle: &Candle) -> Key {
        (
            candle.exchange.clone(),
            candle.symbol.clone(),
            candle.timestamp.timestamp(),
        )
    }

    fn series(
        &self,
        exchange: &str,
        symbol: &str,
        from: i64,
        to: i64,
    ) -> impl Iterator<Item = &Candle> {
        let lo = (exchange.to_owned(), symbol.to_owned(), from);
        let hi = (exchange.to_owned(), symbol.to_owned(), to);
        self.candles.range(lo..hi).map(|(_, c)| c)
    }
}

impl CandleStore for MemoryStore {
    fn day_exists(&self, exchange: &str, symbol: &str, day: NaiveDate) -> Result<bool> {
        let (from, to) = day_bounds(day);
        Ok(self
            .series(exchange, symbol, from.timestamp(), to.timestamp())
            .next()
            .is_some())
    }

    fn insert_all(&mut self, candles: &[Candle]) -> Result<usize> {
        let mut seen = BTreeSet::new();
        for candle in candles {
            let key = Self::key(candle);
            if self.candles.contains_key(&key) || !seen.insert(key) {
                return Err(StoreError::Duplicate {
                    exchange: candle.exchange.clone(),
                    symbol: candle.symbol.clone(),
                    timestamp: candle.timestamp,
                });
            }
        }

        for candle in candles {
            self.candles.insert(Self::key(candle), candle.clone());
        }
        Ok(candles.len())
    }

    fn insert_day(
        &mut self,
        exchange: &str,
        symbol: &str,
        day: NaiveDate,
        candles: &[Candle],
    ) -> Result<DayWrite> {
        check_day(exchange, symbol, day, candles)?;
        if self.day_exists(exchange, symbol, day)? {
            return Ok(DayWrite::Skipped);
        }
        self.insert_all(candles).map(DayWrite::Inserted)
    }

    fn query_range(
        &self,
        exchange: &str,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        if from >= to {
            return Ok(Vec::new());
        }
        Ok(self
            .series(exchange, symbol, from.timestamp(), to.timestamp().saturating_add(1))
            .filter(|c| c.timestamp >= from && c.timestamp < to)
            .cloned()
            .collect())
    }

    fn delete_day(&mut self, exchange: &str, symbol: &str, day: NaiveDate) -> Result<usize> {
        let (from, to) = day_bounds(day);
        let before = self.candles.len();
        self.candles.retain(|(ex, sym, ts), _| {
            ex != exchange || sym != symbol || *ts < from.timestamp() || *ts >= to.timestamp()
        });
        Ok(before - self.candles.len())
    }

    fn summary(&self, exchange: &str, symbol: &str) -> Result<Option<SeriesSummary>> {
        let mut series = self.series(exchange, symbol, i64::MIN, i64::MAX).peekable();
        let Some(first) = series.peek().map(|c| c.timestamp) else {
            return Ok(None);
        };

        let mut candles = 0_u64;
        let mut last = first;
        let mut days = BTreeSet::new();
        for candle in series {
            candles += 1;
            last = candle.timestamp;
            days.insert(candle.timestamp.date_naive());
        }

        Ok(Some(SeriesSummary {
            candles,
            first,
            last,
            days: days.len() as u64,
        }))
    }
}
