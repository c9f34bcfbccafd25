//! Core types for the tamagoyaki candlestick database.
//!
//! This crate provides the fundamental data structures used throughout tamagoyaki:
//!
//! - [`Trade`] - A single executed trade with timestamp, side, size, and price
//! - [`Side`] - Aggressor side of a trade
//! - [`Interval`] - Candle aggregation interval in whole seconds
//! - [`DateRange`] - Inclusive calendar date range for ingestion and export

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tamagoyaki-rs/tamagoyaki/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod interval;
mod trade;

pub use date_range::{DATE_FORMAT, DateRange, DayIterator, day_bounds, parse_date};
pub use error::{DateRangeError, Result, TamagoyakiError};
pub use interval::{Interval, IntervalError};
pub use trade::{Side, SideParseError, Trade};
