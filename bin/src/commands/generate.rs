//! Generate command implementation.
//!
//! Reads stored candles for a day range, resamples them to the requested
//! interval and writes the result to a file.

use crate::commands::normalize_symbol;
use crate::display::write_candles;
use crate::workspace::Workspace;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tamagoyaki_lib::DATE_FORMAT;
use tamagoyaki_lib::prelude::*;

/// Loads `[range.start 00:00, range.end + 1 00:00)` and resamples it.
pub(crate) fn load_resampled(
    store: &impl CandleStore,
    symbol: &str,
    range: &DateRange,
    interval: Interval,
) -> Result<Vec<Candle>> {
    let (from, to) = range.bounds();
    let stored = store.query_range(EXCHANGE, symbol, from, to)?;
    tracing::debug!(symbol, %range, stored = stored.len(), "loaded stored candles");
    Ok(resample_range(&stored, interval, from, to))
}

/// Returns `{SYMBOL}_{BEGIN}_{END}_{INTERVAL}.{ext}`.
pub(crate) fn output_file_name(
    symbol: &str,
    begin: NaiveDate,
    end: NaiveDate,
    interval: Interval,
    format: OutputFormat,
) -> String {
    format!(
        "{symbol}_{}_{}_{interval}.{}",
        begin.format(DATE_FORMAT),
        end.format(DATE_FORMAT),
        format.extension()
    )
}

/// Export the symbol's candles for `[begin, end]` at `interval`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn generate(
    workspace: &Workspace,
    symbol: &str,
    begin: &str,
    end: &str,
    interval: Interval,
    output_dir: &Path,
    format: OutputFormat,
    quiet: bool,
) -> Result<PathBuf> {
    let symbol = normalize_symbol(symbol)?;
    let range = DateRange::parse(begin, end)?;
    let store = workspace.open_existing_store(&symbol)?;

    let candles = load_resampled(&store, &symbol, &range, interval)?;
    if candles.is_empty() {
        tracing::warn!(symbol = %symbol, %range, "no stored candles in range");
    }

    let output = output_dir.join(output_file_name(&symbol, range.start, range.end, interval, format));
    write_candles(&candles, &output, format)?;
    tracing::info!(
        symbol = %symbol,
        %interval,
        candles = candles.len(),
        output = %output.display(),
        "generated candles"
    );

    if !quiet {
        println!("Wrote {} candles to: {}", candles.len(), output.display());
    }

    Ok(output)
}
