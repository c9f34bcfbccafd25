//! Synthetic market data for tamagoyaki benchmarks.

use chrono::{NaiveDate, TimeDelta};
use rust_decimal::Decimal;
use tamagoyaki_types::{Side, Trade, day_bounds};

/// Deterministic linear congruential generator.
#[derive(Debug, Clone)]
pub struct Lcg(u64);

impl Lcg {
    /// Creates a generator from a seed.
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the next pseudo-random value.
    pub const fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }
}

/// Generates `count` time-ordered trades spread over `day`.
///
/// Prices random-walk around 42000 in 0.5 ticks; sizes are whole contracts.
pub fn synthetic_trades(day: NaiveDate, count: usize, seed: u64) -> Vec<Trade> {
    let (start, _) = day_bounds(day);
    let step_ms = 86_400_000 / i64::try_from(count.max(1)).unwrap_or(i64::MAX);
    let mut rng = Lcg::new(seed);
    let mut ticks = 84_000_i64;

    (0..count)
        .map(|i| {
            let r = rng.next_u64();
            ticks += (r % 5) as i64 - 2;
            let side = if r & 1 == 0 { Side::Buy } else { Side::Sell };
            let offset = i64::try_from(i).unwrap_or(i64::MAX) * step_ms;
            Trade::new(
                start + TimeDelta::milliseconds(offset),
                side,
                Decimal::from(1 + r % 100),
                Decimal::new(ticks * 5, 1),
            )
        })
        .collect()
}

/// Renders trades in the Bybit archive CSV layout.
pub fn bybit_csv(symbol: &str, trades: &[Trade]) -> Vec<u8> {
    let mut out = String::from(
        "timestamp,symbol,side,size,price,tickDirection,trdMatchID,grossValue,homeNotional,foreignNotional\n",
    );
    for trade in trades {
        let secs = trade.timestamp.timestamp();
        let micros = trade.timestamp.timestamp_subsec_micros();
        out.push_str(&format!(
            "{secs}.{micros:06},{symbol},{},{},{},ZeroPlusTick,00000000-0000-0000-0000-000000000000,0,0,0\n",
            trade.side.as_str(),
            trade.size,
            trade.price
        ));
    }
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_trades_are_ordered_and_within_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let trades = synthetic_trades(day, 1_000, 7);
        let (from, to) = day_bounds(day);

        assert_eq!(trades.len(), 1_000);
        assert!(trades.is_sorted_by_key(|t| t.timestamp));
        assert!(trades.iter().all(|t| t.timestamp >= from && t.timestamp < to));
        assert!(trades.iter().all(|t| t.price > Decimal::ZERO));
    }

    #[test]
    fn test_bybit_csv_layout() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let csv = bybit_csv("BTCUSD", &synthetic_trades(day, 3, 1));
        let text = String::from_utf8(csv).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().nth(1).unwrap().starts_with("1704067200.000000,BTCUSD,"));
    }
}
