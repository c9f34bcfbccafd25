//! Display utilities and output formatting for the tamagoyaki CLI.

use anyhow::{Context, Result};
#[cfg(not(feature = "parquet"))]
use anyhow::bail;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tamagoyaki_lib::prelude::*;

/// Write candles to a file in the specified format.
pub(crate) fn write_candles(
    candles: &[Candle],
    output: &Path,
    format: OutputFormat,
) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Csv => CsvFormatter::new().write_candles(candles, &mut writer)?,
        OutputFormat::Json => JsonFormatter::new().write_candles(candles, &mut writer)?,
        OutputFormat::Ndjson => JsonFormatter::ndjson().write_candles(candles, &mut writer)?,
        OutputFormat::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_candles(candles, &mut writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                bail!("Parquet support not compiled in");
            }
        }
    }

    // Buffered bytes are only reported as failures by an explicit flush.
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

/// Creates a day-counting progress bar, hidden in quiet mode.
pub(crate) fn day_progress(total_days: u64, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(total_days);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}")
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}
