//! SQLite-backed candle store.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tamagoyaki_aggregate::Candle;
use tamagoyaki_types::day_bounds;

use crate::{CandleStore, DayWrite, Result, SeriesSummary, StoreError, check_day};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS candle (
    id          INTEGER PRIMARY KEY,
    exchange    TEXT    NOT NULL,
    symbol      TEXT    NOT NULL,
    timestamp   INTEGER NOT NULL,
    open        TEXT    NOT NULL,
    high        TEXT    NOT NULL,
    low         TEXT    NOT NULL,
    close       TEXT    NOT NULL,
    volume      TEXT    NOT NULL,
    buy_volume  TEXT    NOT NULL,
    sell_volume TEXT    NOT NULL,
    UNIQUE (exchange, symbol, timestamp)
);
";

/// Candle store backed by a single SQLite database.
///
/// Prices and volumes are stored as decimal text so no precision is lost;
/// timestamps are stored as epoch seconds.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        tracing::debug!(path = %path.display(), "opened candle database");
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    /// Returns the database file path, or `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn exists_between(conn: &Connection, exchange: &str, symbol: &str, day: NaiveDate) -> Result<bool> {
    let (from, to) = day_bounds(day);
    let found = conn
        .query_row(
            "SELECT 1 FROM candle
             WHERE exchange = ?1 AND symbol = ?2 AND timestamp >= ?3 AND timestamp < ?4
             LIMIT 1",
            params![exchange, symbol, from.timestamp(), to.timestamp()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn insert_rows(conn: &Connection, candles: &[Candle]) -> Result<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO candle
         (exchange, symbol, timestamp, open, high, low, close, volume, buy_volume, sell_volume)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;

    for candle in candles {
        stmt.execute(params![
            candle.exchange,
            candle.symbol,
            candle.timestamp.timestamp(),
            candle.open.to_string(),
            candle.high.to_string(),
            candle.low.to_string(),
            candle.close.to_string(),
            candle.volume.to_string(),
            candle.buy_volume.to_string(),
            candle.sell_volume.to_string(),
        ])
        .map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => StoreError::Duplicate {
                exchange: candle.exchange.clone(),
                symbol: candle.symbol.clone(),
                timestamp: candle.timestamp,
            },
            _ => StoreError::Sqlite(e),
        })?;
    }

    Ok(candles.len())
}

/// A candle row with its columns still in stored form.
struct RawRow {
    exchange: String,
    symbol: String,
    timestamp: i64,
    values: [String; 7],
}

const VALUE_COLUMNS: [&str; 7] = [
    "open",
    "high",
    "low",
    "close",
    "volume",
    "buy_volume",
    "sell_volume",
];

impl RawRow {
    fn decode(self) -> Result<Candle> {
        let timestamp =
            DateTime::from_timestamp(self.timestamp, 0).ok_or_else(|| StoreError::Corrupt {
                column: "timestamp",
                value: self.timestamp.to_string(),
            })?;

        let mut decoded = [Decimal::ZERO; 7];
        for ((slot, raw), column) in decoded.iter_mut().zip(&self.values).zip(VALUE_COLUMNS) {
            *slot = Decimal::from_str(raw).map_err(|_| StoreError::Corrupt {
                column,
                value: raw.clone(),
            })?;
        }
        let [open, high, low, close, volume, buy_volume, sell_volume] = decoded;

        Ok(Candle {
            exchange: self.exchange,
            symbol: self.symbol,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            buy_volume,
            sell_volume,
        })
    }
}

impl CandleStore for SqliteStore {
    fn day_exists(&self, exchange: &str, symbol: &str, day: NaiveDate) -> Result<bool> {
        exists_between(&self.conn, exchange, symbol, day)
    }

    fn insert_all(&mut self, candles: &[Candle]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let written = insert_rows(&tx, candles)?;
        tx.commit()?;
        tracing::debug!(written, "inserted candles");
        Ok(written)
    }

    fn insert_day(
        &mut self,
        exchange: &str,
        symbol: &str,
        day: NaiveDate,
        candles: &[Candle],
    ) -> Result<DayWrite> {
        check_day(exchange, symbol, day, candles)?;

        // IMMEDIATE takes the write lock up front, so no other writer can
        // slip rows in between the check and the insert.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if exists_between(&tx, exchange, symbol, day)? {
            return Ok(DayWrite::Skipped);
        }
        let written = insert_rows(&tx, candles)?;
        tx.commit()?;

        tracing::debug!(exchange, symbol, %day, written, "stored day");
        Ok(DayWrite::Inserted(written))
    }

    fn query_range(
        &self,
        exchange: &str,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Candle>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT exchange, symbol, timestamp, open, high, low, close, volume, buy_volume, sell_volume
             FROM candle
             WHERE exchange = ?1 AND symbol = ?2 AND timestamp >= ?3 AND timestamp < ?4
             ORDER BY timestamp",
        )?;

        // Stored stamps are whole seconds; round sub-second bounds up.
        let ceil_secs = |t: DateTime<Utc>| t.timestamp() + i64::from(t.timestamp_subsec_nanos() > 0);
        let (from_secs, to_secs) = (ceil_secs(from), ceil_secs(to));

        let rows = stmt
            .query_map(params![exchange, symbol, from_secs, to_secs], |row| {
                Ok(RawRow {
                    exchange: row.get(0)?,
                    symbol: row.get(1)?,
                    timestamp: row.get(2)?,
                    values: [
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                        row.get(8)?,
                        row.get(9)?,
                    ],
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(RawRow::decode).collect()
    }

    fn delete_day(&mut self, exchange: &str, symbol: &str, day: NaiveDate) -> Result<usize> {
        let (from, to) = day_bounds(day);
        let deleted = self.conn.execute(
            "DELETE FROM candle
             WHERE exchange = ?1 AND symbol = ?2 AND timestamp >= ?3 AND timestamp < ?4",
            params![exchange, symbol, from.timestamp(), to.timestamp()],
        )?;
        tracing::debug!(exchange, symbol, %day, deleted, "deleted day");
        Ok(deleted)
    }

    fn summary(&self, exchange: &str, symbol: &str) -> Result<Option<SeriesSummary>> {
        let (count, first, last, days): (i64, Option<i64>, Option<i64>, i64) = self.conn.query_row(
            "SELECT COUNT(*), MIN(timestamp), MAX(timestamp),
                    COUNT(DISTINCT date(timestamp, 'unixepoch'))
             FROM candle WHERE exchange = ?1 AND symbol = ?2",
            params![exchange, symbol],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        let (Some(first), Some(last)) = (first, last) else {
            return Ok(None);
        };
        let decode = |secs: i64| {
            DateTime::from_timestamp(secs, 0).ok_or_else(|| StoreError::Corrupt {
                column: "timestamp",
                value: secs.to_string(),
            })
        };

        Ok(Some(SeriesSummary {
            candles: u64::try_from(count).unwrap_or_default(),
            first: decode(first)?,
            last: decode(last)?,
            days: u64::try_from(days).unwrap_or_default(),
        }))
    }
}
