//! Trade (tick) representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Aggressor side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Taker bought (lifted the offer).
    Buy,
    /// Taker sold (hit the bid).
    Sell,
}

impl Side {
    /// Returns the side as it appears in exchange archives.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Sell => "Sell",
        }
    }

    /// Returns true for buyer-initiated trades.
    #[must_use]
    pub const fn is_buy(&self) -> bool {
        matches!(self, Self::Buy)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = SideParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(Self::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(Self::Sell)
        } else {
            Err(SideParseError(s.to_string()))
        }
    }
}

/// Error returned when parsing an invalid trade side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideParseError(String);

impl std::fmt::Display for SideParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid trade side '{}', expected Buy or Sell", self.0)
    }
}

impl std::error::Error for SideParseError {}

/// A single executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Execution time (UTC, sub-second precision).
    pub timestamp: DateTime<Utc>,
    /// Aggressor side.
    pub side: Side,
    /// Executed quantity.
    pub size: Decimal,
    /// Execution price.
    pub price: Decimal,
}

impl Trade {
    /// Creates a new trade.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, side: Side, size: Decimal, price: Decimal) -> Self {
        Self {
            timestamp,
            side,
            size,
            price,
        }
    }

    /// Returns the size attributed to the buy side (zero for sells).
    #[must_use]
    pub fn buy_size(&self) -> Decimal {
        if self.side.is_buy() {
            self.size
        } else {
            Decimal::ZERO
        }
    }

    /// Returns the size attributed to the sell side (zero for buys).
    #[must_use]
    pub fn sell_size(&self) -> Decimal {
        if self.side.is_buy() {
            Decimal::ZERO
        } else {
            self.size
        }
    }
}
