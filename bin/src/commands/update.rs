//! Update command implementation.
//!
//! Downloads daily trade archives, aggregates them into candles and stores
//! every day that is not in the database yet.

use crate::commands::normalize_symbol;
use crate::display::day_progress;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::StreamExt;
use tamagoyaki_lib::day_bounds;
use tamagoyaki_lib::prelude::*;

/// What happened to one day of the requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayOutcome {
    /// Candles were written.
    Stored(usize),
    /// The day was already in the database.
    AlreadyPresent,
    /// No archive is published for the day.
    NoArchive,
    /// Download or decoding failed; the day was left untouched.
    Failed,
}

/// Per-run totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct UpdateReport {
    pub(crate) stored_days: usize,
    pub(crate) candles: usize,
    pub(crate) present_days: usize,
    pub(crate) missing_days: usize,
    pub(crate) failed_days: usize,
}

impl UpdateReport {
    pub(crate) const fn record(&mut self, outcome: DayOutcome) {
        match outcome {
            DayOutcome::Stored(candles) => {
                self.stored_days += 1;
                self.candles += candles;
            }
            DayOutcome::AlreadyPresent => self.present_days += 1,
            DayOutcome::NoArchive => self.missing_days += 1,
            DayOutcome::Failed => self.failed_days += 1,
        }
    }
}

impl std::fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Stored {} days ({} candles), {} already present, {} without archive",
            self.stored_days, self.candles, self.present_days, self.missing_days
        )?;
        if self.failed_days > 0 {
            write!(f, ", {} failed", self.failed_days)?;
        }
        Ok(())
    }
}

/// Returns the days of `range` that have no stored candle.
pub(crate) fn pending_days(
    store: &impl CandleStore,
    symbol: &str,
    range: &DateRange,
) -> Result<Vec<NaiveDate>> {
    let mut pending = Vec::new();
    for day in range.days() {
        if !store.day_exists(EXCHANGE, symbol, day)? {
            pending.push(day);
        }
    }
    Ok(pending)
}

/// Aggregates one downloaded day and writes it to the store.
pub(crate) fn ingest_day(
    store: &mut impl CandleStore,
    symbol: &str,
    batch: &DayBatch,
    interval: Interval,
) -> Result<DayOutcome> {
    if batch.had_error() {
        return Ok(DayOutcome::Failed);
    }
    if batch.is_empty() {
        return Ok(DayOutcome::NoArchive);
    }

    let (from, to) = day_bounds(batch.day);
    let trades: Vec<Trade> = batch
        .trades
        .iter()
        .filter(|t| t.timestamp >= from && t.timestamp < to)
        .copied()
        .collect();
    if trades.len() < batch.len() {
        tracing::warn!(
            day = %batch.day,
            dropped = batch.len() - trades.len(),
            "archive has trades outside its day"
        );
    }

    let candles = aggregate_trades_checked(EXCHANGE, symbol, &trades, interval)
        .with_context(|| format!("Failed to aggregate {symbol} trades for {}", batch.day))?;

    let outcome = match store.insert_day(EXCHANGE, symbol, batch.day, &candles)? {
        DayWrite::Inserted(written) => DayOutcome::Stored(written),
        DayWrite::Skipped => DayOutcome::AlreadyPresent,
    };
    tracing::info!(symbol, day = %batch.day, trades = trades.len(), ?outcome, "ingested day");
    Ok(outcome)
}

/// Update the symbol's database for every day in `[begin, end]`.
pub(crate) async fn update(
    workspace: &Workspace,
    symbol: &str,
    begin: &str,
    end: &str,
    interval: Interval,
    concurrency: usize,
    quiet: bool,
) -> Result<UpdateReport> {
    let symbol = normalize_symbol(symbol)?;
    let range = DateRange::parse(begin, end)?;
    let mut store = workspace.open_store(&symbol)?;

    let pending = pending_days(&store, &symbol, &range)?;
    let mut report = UpdateReport {
        present_days: range.total_days() - pending.len(),
        ..Default::default()
    };
    tracing::info!(
        symbol = %symbol,
        %range,
        %interval,
        pending = pending.len(),
        present = report.present_days,
        "starting update"
    );

    let progress = day_progress(range.total_days() as u64, quiet)?;
    progress.set_message(format!("{symbol} {range}"));
    progress.inc(report.present_days as u64);

    let config = ClientConfig {
        concurrency,
        ..Default::default()
    };
    let client = DownloadClient::new(config).context("Failed to create HTTP client")?;

    let mut batches = trade_stream(&client, &symbol, pending);
    while let Some(batch) = batches.next().await {
        let outcome = ingest_day(&mut store, &symbol, &batch, interval)?;
        report.record(outcome);
        progress.set_message(format!("{symbol} {}", batch.day));
        progress.inc(1);
    }

    progress.finish_with_message(report.to_string());
    tracing::info!(symbol = %symbol, ?report, "update finished");

    if !quiet {
        println!("{report}");
        println!("Database: {}", workspace.db_path(&symbol).display());
    }

    Ok(report)
}
