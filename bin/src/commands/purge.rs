//! Purge command implementation.
//!
//! Removes stored days so that `update` downloads them again, for example
//! after an interrupted or partial write.

use crate::commands::normalize_symbol;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use inquire::Confirm;
use tamagoyaki_lib::prelude::*;

/// Deletes every stored candle of the symbol within `range`.
pub(crate) fn purge_days(
    store: &mut impl CandleStore,
    symbol: &str,
    range: &DateRange,
) -> Result<usize> {
    let mut deleted = 0;
    for day in range.days() {
        deleted += store.delete_day(EXCHANGE, symbol, day)?;
    }
    Ok(deleted)
}

/// Delete stored candles for `[begin, end]`, asking first unless `yes`.
pub(crate) fn purge(
    workspace: &Workspace,
    symbol: &str,
    begin: &str,
    end: &str,
    yes: bool,
) -> Result<usize> {
    let symbol = normalize_symbol(symbol)?;
    let range = DateRange::parse(begin, end)?;
    let mut store = workspace.open_existing_store(&symbol)?;

    if !yes {
        let confirmed = Confirm::new(&format!(
            "Delete all {symbol} candles from {range} ({} days)?",
            range.total_days()
        ))
        .with_default(false)
        .prompt()
        .context("Confirmation cancelled")?;

        if !confirmed {
            println!("Aborted.");
            return Ok(0);
        }
    }

    let deleted = purge_days(&mut store, &symbol, &range)?;
    tracing::info!(symbol = %symbol, %range, deleted, "purged candles");
    println!("Deleted {deleted} candles.");

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_purge_days_only_touches_range() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let candles: Vec<_> = (0..5)
            .map(|d| {
                Candle::new(
                    EXCHANGE,
                    "BTCUSD",
                    start + TimeDelta::days(d),
                    dec!(1),
                    dec!(1),
                    dec!(1),
                    dec!(1),
                    dec!(1),
                    dec!(0),
                )
            })
            .collect();
        let mut store = MemoryStore::new();
        store.insert_all(&candles).unwrap();

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .unwrap();

        assert_eq!(purge_days(&mut store, "BTCUSD", &range).unwrap(), 2);
        assert_eq!(store.len(), 3);
        assert_eq!(purge_days(&mut store, "BTCUSD", &range).unwrap(), 0);
    }
}
