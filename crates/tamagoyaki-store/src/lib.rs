//! Candle persistence for the tamagoyaki candlestick database.
//!
//! - [`CandleStore`] - Storage contract used by ingestion and export
//! - [`SqliteStore`] - SQLite-backed store, one database file per symbol
//! - [`MemoryStore`] - In-memory store with the same semantics

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/tamagoyaki-rs/tamagoyaki/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod memory;
mod sqlite;
mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{CandleStore, DayWrite, SeriesSummary, check_day};
