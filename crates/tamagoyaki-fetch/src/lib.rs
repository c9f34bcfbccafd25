//! HTTP client and trade archive fetching for tamagoyaki.
//!
//! This crate provides the trade download pipeline:
//!
//! - [`url::trade_url`] - Constructs Bybit archive URLs
//! - [`DownloadClient`] - HTTP client with connection pooling and retries
//! - [`decompress::decompress_gzip`] - Gzip decompression
//! - [`parse::parse_trades`] - CSV trade parsing
//! - [`trade_stream`] - Async per-day trade download

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tamagoyaki-rs/tamagoyaki/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
pub mod decompress;
pub mod parse;
mod stream;
pub mod url;

pub use client::{ClientConfig, DownloadClient, DownloadError};
pub use decompress::{DecompressError, decompress_gzip};
pub use parse::{ParseError, parse_timestamp, parse_trades};
pub use stream::{DayBatch, fetch_day, trade_stream};
pub use url::EXCHANGE;
