//! OHLCV candle data structure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tamagoyaki_types::Interval;

/// OHLCV candle with the traded volume split by aggressor side.
///
/// `(exchange, symbol, timestamp)` is the natural key of a stored candle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Exchange the trades were executed on (e.g. "bybit").
    pub exchange: String,
    /// Instrument symbol (e.g. "BTCUSD").
    pub symbol: String,
    /// Bucket open time (start of the interval).
    pub timestamp: DateTime<Utc>,
    /// Price of the first trade in the bucket.
    pub open: Decimal,
    /// Highest price during the bucket.
    pub high: Decimal,
    /// Lowest price during the bucket.
    pub low: Decimal,
    /// Price of the last trade in the bucket.
    pub close: Decimal,
    /// Total traded size.
    pub volume: Decimal,
    /// Size traded by buy-side aggressors.
    pub buy_volume: Decimal,
    /// Size traded by sell-side aggressors.
    pub sell_volume: Decimal,
}

impl Candle {
    /// Creates a new candle.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        exchange: impl Into<String>,
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        buy_volume: Decimal,
        sell_volume: Decimal,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            symbol: symbol.into(),
            timestamp,
            open,
            high,
            low,
            close,
            volume: buy_volume + sell_volume,
            buy_volume,
            sell_volume,
        }
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// Returns the body size (|close - open|).
    #[must_use]
    pub fn body(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// Returns true if this is a bullish (green) candle.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Returns true if this is a bearish (red) candle.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Returns the typical price ((high + low + close) / 3).
    #[must_use]
    pub fn typical_price(&self) -> Decimal {
        (self.high + self.low + self.close) / Decimal::from(3)
    }

    /// Returns buy volume minus sell volume.
    #[must_use]
    pub fn volume_delta(&self) -> Decimal {
        self.buy_volume - self.sell_volume
    }

    /// Returns true if the candle satisfies the OHLCV invariants:
    /// open and close within `[low, high]`, non-negative volumes, and
    /// `volume == buy_volume + sell_volume`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
            && !self.buy_volume.is_sign_negative()
            && !self.sell_volume.is_sign_negative()
            && self.volume == self.buy_volume + self.sell_volume
    }

    /// Returns true if the timestamp lies on an `interval` boundary.
    #[must_use]
    pub fn is_aligned(&self, interval: Interval) -> bool {
        self.timestamp.timestamp_subsec_nanos() == 0
            && self.timestamp.timestamp().rem_euclid(interval.secs()) == 0
    }
}
