//! Candle aggregation for the tamagoyaki candlestick database.
//!
//! This crate provides the pure candle transformations:
//!
//! - [`bucket_start`] - Interval bucketing of instants
//! - [`Candle`] - OHLCV candle with buy/sell volume split
//! - [`TickAggregator`] - Streaming trade-to-candle aggregator
//! - [`resample`] - Candle-to-coarser-candle resampling

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tamagoyaki-rs/tamagoyaki/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod bucket;
mod candle;
mod resample;

pub use aggregator::{
    Accumulator, AggregateError, CandleBuilder, TickAggregator, aggregate_trades,
    aggregate_trades_checked,
};
pub use bucket::{bucket_epoch, bucket_start};
pub use candle::Candle;
pub use resample::{resample, resample_range};
