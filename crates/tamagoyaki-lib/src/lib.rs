//! Crypto trade-to-candle aggregation and candle database library.
//!
//! This is a facade crate that re-exports functionality from the tamagoyaki
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use tamagoyaki_lib::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DownloadClient::with_defaults()?;
//!     let mut store = SqliteStore::open("BTCUSD.db")?;
//!     let range = DateRange::parse("20240101", "20240107")?;
//!
//!     let mut batches = trade_stream(&client, "BTCUSD", range.days().collect());
//!     while let Some(batch) = batches.next().await {
//!         let candles = aggregate_trades(EXCHANGE, "BTCUSD", &batch.trades, Interval::SECOND);
//!         store.insert_day(EXCHANGE, "BTCUSD", batch.day, &candles)?;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tamagoyaki-rs/tamagoyaki/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tamagoyaki_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use tamagoyaki_fetch::{
    ClientConfig, DayBatch, DecompressError, DownloadClient, DownloadError, EXCHANGE, ParseError,
    fetch_day, trade_stream,
};

// Re-export aggregation
#[cfg(feature = "aggregate")]
pub use tamagoyaki_aggregate::{
    AggregateError, Candle, TickAggregator, aggregate_trades, aggregate_trades_checked,
    bucket_start, resample, resample_range,
};

// Re-export storage
#[cfg(feature = "store")]
pub use tamagoyaki_store::{
    CandleStore, DayWrite, MemoryStore, SeriesSummary, SqliteStore, StoreError,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use tamagoyaki_format::{CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use tamagoyaki_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use tamagoyaki_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tamagoyaki_types::{
        DateRange, DateRangeError, Interval, IntervalError, Side, TamagoyakiError, Trade,
    };

    #[cfg(feature = "fetch")]
    pub use tamagoyaki_fetch::{ClientConfig, DayBatch, DownloadClient, EXCHANGE, trade_stream};

    #[cfg(feature = "aggregate")]
    pub use tamagoyaki_aggregate::{
        Candle, TickAggregator, aggregate_trades, aggregate_trades_checked, resample,
        resample_range,
    };

    #[cfg(feature = "store")]
    pub use tamagoyaki_store::{CandleStore, DayWrite, MemoryStore, SeriesSummary, SqliteStore};

    #[cfg(feature = "format")]
    pub use tamagoyaki_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use tamagoyaki_format::ParquetFormatter;
}
