//! Streaming trade-to-candle aggregation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tamagoyaki_types::{Interval, Trade};
use thiserror::Error;

use crate::{Candle, bucket_start};

/// Errors raised by the validating aggregation entry point.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    /// A trade fell into a bucket earlier than the one being accumulated.
    #[error("Trade #{index} at {timestamp} belongs to bucket {bucket}, before open bucket {current}")]
    OutOfOrder {
        /// Position of the offending trade in the input.
        index: usize,
        /// Timestamp of the offending trade.
        timestamp: DateTime<Utc>,
        /// Bucket the offending trade maps to.
        bucket: DateTime<Utc>,
        /// Bucket that was open when the trade arrived.
        current: DateTime<Utc>,
    },
}

/// Running OHLCV state of a single open bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleBuilder {
    bucket: DateTime<Utc>,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: Decimal,
    buy_volume: Decimal,
    sell_volume: Decimal,
}

impl CandleBuilder {
    /// Opens a bucket from its first trade.
    #[must_use]
    pub fn new(bucket: DateTime<Utc>, trade: &Trade) -> Self {
        Self {
            bucket,
            open: trade.price,
            high: trade.price,
            low: trade.price,
            close: trade.price,
            volume: trade.size,
            buy_volume: trade.buy_size(),
            sell_volume: trade.sell_size(),
        }
    }

    /// Folds another trade of the same bucket into the running state.
    pub fn update(&mut self, trade: &Trade) {
        self.high = self.high.max(trade.price);
        self.low = self.low.min(trade.price);
        self.close = trade.price;
        self.volume += trade.size;
        self.buy_volume += trade.buy_size();
        self.sell_volume += trade.sell_size();
    }

    /// Returns the bucket start this builder accumulates.
    #[must_use]
    pub const fn bucket(&self) -> DateTime<Utc> {
        self.bucket
    }

    /// Finishes building and returns the candle for the given series.
    #[must_use]
    pub fn build(self, exchange: &str, symbol: &str) -> Candle {
        Candle {
            exchange: exchange.to_string(),
            symbol: symbol.to_string(),
            timestamp: self.bucket,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            buy_volume: self.buy_volume,
            sell_volume: self.sell_volume,
        }
    }
}

/// Explicit state of the aggregation fold: no bucket yet, or one open bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Accumulator {
    /// No trade seen yet.
    #[default]
    Empty,
    /// A bucket is being accumulated.
    Open(CandleBuilder),
}

impl Accumulator {
    /// Feeds one trade into the fold.
    ///
    /// Returns the next state and, when the trade starts a new bucket, the
    /// completed previous bucket.
    #[must_use]
    pub fn step(self, trade: &Trade, interval: Interval) -> (Self, Option<CandleBuilder>) {
        let bucket = bucket_start(trade.timestamp, interval);

        match self {
            Self::Open(mut builder) if builder.bucket == bucket => {
                builder.update(trade);
                (Self::Open(builder), None)
            }
            Self::Open(builder) => (Self::Open(CandleBuilder::new(bucket, trade)), Some(builder)),
            Self::Empty => (Self::Open(CandleBuilder::new(bucket, trade)), None),
        }
    }

    /// Ends the fold, returning the last (possibly partial) bucket.
    #[must_use]
    pub fn finish(self) -> Option<CandleBuilder> {
        match self {
            Self::Open(builder) => Some(builder),
            Self::Empty => None,
        }
    }

    /// Returns the currently open bucket, if any.
    #[must_use]
    pub const fn bucket(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Open(builder) => Some(builder.bucket),
            Self::Empty => None,
        }
    }
}

/// Streaming trade aggregator.
///
/// Aggregates trades of one exchange/symbol into candles of a fixed interval.
/// Trades must arrive in non-decreasing bucket order; an earlier bucket after
/// a later one opens a spurious extra candle instead of merging.
#[derive(Debug)]
pub struct TickAggregator {
    exchange: String,
    symbol: String,
    interval: Interval,
    state: Accumulator,
}

impl TickAggregator {
    /// Creates a new aggregator for the given series and interval.
    #[must_use]
    pub fn new(exchange: impl Into<String>, symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            exchange: exchange.into(),
            symbol: symbol.into(),
            interval,
            state: Accumulator::Empty,
        }
    }

    /// Returns the interval being aggregated to.
    #[must_use]
    pub const fn interval(&self) -> Interval {
        self.interval
    }

    /// Returns the bucket currently being accumulated.
    #[must_use]
    pub const fn current_bucket(&self) -> Option<DateTime<Utc>> {
        self.state.bucket()
    }

    /// Processes a trade, potentially emitting a completed candle.
    ///
    /// Returns `Some(candle)` when a candle is completed by this trade,
    /// `None` otherwise.
    pub fn process(&mut self, trade: &Trade) -> Option<Candle> {
        let (next, completed) = std::mem::take(&mut self.state).step(trade, self.interval);
        self.state = next;
        completed.map(|builder| builder.build(&self.exchange, &self.symbol))
    }

    /// Finishes aggregation, returning any remaining partial candle.
    #[must_use]
    pub fn finish(self) -> Option<Candle> {
        self.state
            .finish()
            .map(|builder| builder.build(&self.exchange, &self.symbol))
    }
}

/// Aggregates an ordered trade sequence into candles.
///
/// An empty input yields an empty output.
#[must_use]
pub fn aggregate_trades(
    exchange: &str,
    symbol: &str,
    trades: &[Trade],
    interval: Interval,
) -> Vec<Candle> {
    let mut aggregator = TickAggregator::new(exchange, symbol, interval);
    let mut candles = Vec::new();

    for trade in trades {
        if let Some(candle) = aggregator.process(trade) {
            candles.push(candle);
        }
    }

    if let Some(candle) = aggregator.finish() {
        candles.push(candle);
    }

    candles
}

/// Like [`aggregate_trades`], but fails instead of emitting spurious candles
/// when the ordering precondition is violated.
///
/// Trades out of order within the bucket being accumulated are accepted.
///
/// # Errors
///
/// Returns [`AggregateError::OutOfOrder`] for the first trade whose bucket is
/// earlier than the open bucket.
pub fn aggregate_trades_checked(
    exchange: &str,
    symbol: &str,
    trades: &[Trade],
    interval: Interval,
) -> Result<Vec<Candle>, AggregateError> {
    let mut aggregator = TickAggregator::new(exchange, symbol, interval);
    let mut candles = Vec::new();

    for (index, trade) in trades.iter().enumerate() {
        let bucket = bucket_start(trade.timestamp, interval);
        if let Some(current) = aggregator.current_bucket().filter(|current| bucket < *current) {
            return Err(AggregateError::OutOfOrder {
                index,
                timestamp: trade.timestamp,
                bucket,
                current,
            });
        }
        if let Some(candle) = aggregator.process(trade) {
            candles.push(candle);
        }
    }

    candles.extend(aggregator.finish());
    Ok(candles)
}
