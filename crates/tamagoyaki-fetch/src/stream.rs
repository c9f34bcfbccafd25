//! Streaming per-day trade download pipeline.

use chrono::NaiveDate;
use futures::stream::{self, Stream, StreamExt};
use tamagoyaki_types::{TamagoyakiError, Trade};

use crate::{DownloadClient, decompress_gzip, parse_trades, url::trade_url};

/// The trades of a single day.
#[derive(Debug, Clone)]
pub struct DayBatch {
    /// The UTC calendar day.
    pub day: NaiveDate,
    /// The trades of that day, in non-decreasing timestamp order.
    pub trades: Vec<Trade>,
    /// Whether this batch had an error that was skipped.
    pub had_error: bool,
}

impl DayBatch {
    /// Creates a new batch, ordering the trades by timestamp.
    ///
    /// Newest-first archives are reversed so rows sharing a timestamp end up
    /// in execution order. Anything else is stably sorted, keeping archive
    /// order within a timestamp.
    #[must_use]
    pub fn new(day: NaiveDate, mut trades: Vec<Trade>) -> Self {
        if !trades.is_sorted_by_key(|t| t.timestamp) {
            if trades.iter().rev().is_sorted_by_key(|t| t.timestamp) {
                trades.reverse();
            } else {
                trades.sort_by_key(|t| t.timestamp);
            }
        }
        Self {
            day,
            trades,
            had_error: false,
        }
    }

    /// Creates a new batch that represents a skipped error.
    #[must_use]
    pub const fn skipped_error(day: NaiveDate) -> Self {
        Self {
            day,
            trades: Vec::new(),
            had_error: true,
        }
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Returns the number of trades in the batch.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.trades.len()
    }

    /// Returns true if this batch had an error that was skipped.
    #[must_use]
    pub const fn had_error(&self) -> bool {
        self.had_error
    }
}

/// Downloads, decompresses and parses one day of trades.
///
/// A missing archive (404) yields an empty batch.
///
/// # Errors
///
/// Returns an error if the download, decompression or parsing fails.
pub async fn fetch_day(
    client: &DownloadClient,
    symbol: &str,
    day: NaiveDate,
) -> Result<DayBatch, TamagoyakiError> {
    let url = trade_url(symbol, day);
    tracing::info!(%url, "downloading trade archive");

    let Some(compressed) = client
        .download(&url)
        .await
        .map_err(|e| TamagoyakiError::Http(e.to_string()))?
    else {
        tracing::warn!(%url, "no archive published for day");
        return Ok(DayBatch::new(day, Vec::new()));
    };

    // Inflate and parse off the async executor.
    let trades = tokio::task::spawn_blocking(move || {
        let csv = decompress_gzip(&compressed)
            .map_err(|e| TamagoyakiError::Decompress(e.to_string()))?;
        parse_trades(&csv).map_err(|e| TamagoyakiError::Parse(e.to_string()))
    })
    .await
    .map_err(|e| TamagoyakiError::Decompress(format!("spawn_blocking failed: {e}")))??;

    tracing::debug!(%day, trades = trades.len(), "parsed trade archive");
    Ok(DayBatch::new(day, trades))
}

/// Creates an async stream of day batches for the given symbol and days.
///
/// Up to `concurrency` days are downloaded at once, but batches are yielded
/// in the order of `days`. A day that fails is logged and returned as an
/// empty batch with `had_error` set, so one bad archive does not abort the
/// rest of the range.
pub fn trade_stream<'a>(
    client: &'a DownloadClient,
    symbol: &'a str,
    days: Vec<NaiveDate>,
) -> impl Stream<Item = DayBatch> + 'a {
    let concurrency = client.config().concurrency.max(1);

    stream::iter(days)
        .map(move |day| async move {
            match fetch_day(client, symbol, day).await {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::error!(%day, symbol, error = %e, "failed to fetch trades");
                    DayBatch::skipped_error(day)
                }
            }
        })
        .buffered(concurrency)
}
