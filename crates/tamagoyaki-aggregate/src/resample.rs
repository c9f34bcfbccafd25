//! Candle resampling to coarser intervals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tamagoyaki_types::Interval;

use crate::{Candle, bucket_epoch, bucket_start};

/// Running aggregate of the source candles that fall into one target bucket.
#[derive(Debug)]
struct Group<'a> {
    first: &'a Candle,
    last: &'a Candle,
    high: Decimal,
    low: Decimal,
    volume: Decimal,
    buy_volume: Decimal,
    sell_volume: Decimal,
}

impl<'a> Group<'a> {
    const fn new(candle: &'a Candle) -> Self {
        Self {
            first: candle,
            last: candle,
            high: candle.high,
            low: candle.low,
            volume: candle.volume,
            buy_volume: candle.buy_volume,
            sell_volume: candle.sell_volume,
        }
    }

    fn merge(&mut self, candle: &'a Candle) {
        if candle.timestamp < self.first.timestamp {
            self.first = candle;
        }
        if candle.timestamp >= self.last.timestamp {
            self.last = candle;
        }
        self.high = self.high.max(candle.high);
        self.low = self.low.min(candle.low);
        self.volume += candle.volume;
        self.buy_volume += candle.buy_volume;
        self.sell_volume += candle.sell_volume;
    }

    fn finish(self, interval: Interval) -> Candle {
        Candle {
            exchange: self.first.exchange.clone(),
            symbol: self.first.symbol.clone(),
            timestamp: bucket_start(self.first.timestamp, interval),
            open: self.first.open,
            high: self.high,
            low: self.low,
            close: self.last.close,
            volume: self.volume,
            buy_volume: self.buy_volume,
            sell_volume: self.sell_volume,
        }
    }
}

/// Resamples candles of one series into `interval` buckets.
///
/// Each output candle takes its open from the earliest source candle in the
/// bucket, its close from the latest, the extreme high/low, and summed
/// volumes. Buckets without source candles produce no output. The result is
/// sorted by timestamp regardless of input order.
#[must_use]
pub fn resample(candles: &[Candle], interval: Interval) -> Vec<Candle> {
    let mut groups: BTreeMap<i64, Group<'_>> = BTreeMap::new();

    for candle in candles {
        let key = bucket_epoch(candle.timestamp.timestamp(), interval);
        match groups.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(Group::new(candle));
            }
            Entry::Occupied(mut entry) => entry.get_mut().merge(candle),
        }
    }

    groups
        .into_values()
        .map(|group| group.finish(interval))
        .collect()
}

/// Resamples only the source candles with `from <= timestamp < to`.
#[must_use]
pub fn resample_range(
    candles: &[Candle],
    interval: Interval,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<Candle> {
    let in_range: Vec<Candle> = candles
        .iter()
        .filter(|candle| candle.timestamp >= from && candle.timestamp < to)
        .cloned()
        .collect();
    resample(&in_range, interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate_trades;
    use chrono::{TimeDelta, TimeZone};
    use rust_decimal_macros::dec;
    use tamagoyaki_types::{Side, Trade};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn make_candle(secs: i64, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Candle {
        Candle::new("bybit", "BTCUSD", at(secs), open, high, low, close, dec!(1), dec!(0.5))
    }

    fn interval(secs: i64) -> Interval {
        Interval::from_secs(secs).unwrap()
    }

    /// A gap-free run of one-second candles with a wandering price.
    fn second_series(start: i64, len: i64) -> Vec<Candle> {
        let mut price = dec!(100);
        (0..len)
            .map(|i| {
                let step = Decimal::from((i * 7) % 5) - dec!(2);
                let open = price;
                price += step;
                let high = open.max(price) + dec!(0.5);
                let low = open.min(price) - dec!(0.25);
                Candle::new(
                    "bybit",
                    "BTCUSD",
                    at(start + i),
                    open,
                    high,
                    low,
                    price,
                    Decimal::from(i % 3),
                    Decimal::from(i % 2) / dec!(4),
                )
            })
            .collect()
    }

    #[test]
    fn test_resample_gap_scenario() {
        let candles = vec![
            make_candle(0, dec!(10), dec!(12), dec!(9), dec!(11)),
            make_candle(1, dec!(11), dec!(15), dec!(10), dec!(14)),
            make_candle(3, dec!(14), dec!(14), dec!(8), dec!(9)),
        ];

        let result = resample(&candles, interval(2));
        assert_eq!(result.len(), 2);

        assert_eq!(result[0].timestamp, at(0));
        assert_eq!(result[0].open, dec!(10));
        assert_eq!(result[0].high, dec!(15));
        assert_eq!(result[0].low, dec!(9));
        assert_eq!(result[0].close, dec!(14));
        assert_eq!(result[0].volume, dec!(3));
        assert_eq!(result[0].buy_volume, dec!(2));
        assert_eq!(result[0].sell_volume, dec!(1));

        assert_eq!(result[1].timestamp, at(2));
        assert_eq!(result[1].open, dec!(14));
        assert_eq!(result[1].close, dec!(9));
        assert_eq!(result[1].low, dec!(8));
        assert_eq!(result[1].volume, dec!(1.5));
    }

    #[test]
    fn test_empty_target_buckets_are_dropped() {
        let candles = vec![
            make_candle(0, dec!(1), dec!(1), dec!(1), dec!(1)),
            make_candle(600, dec!(2), dec!(2), dec!(2), dec!(2)),
        ];
        let result = resample(&candles, Interval::MINUTE);
        let stamps: Vec<_> = result.iter().map(|c| c.timestamp.timestamp()).collect();
        assert_eq!(stamps, vec![0, 600]);
    }

    #[test]
    fn test_resample_to_same_interval_is_identity() {
        let candles = second_series(1_704_067_200, 120);
        assert_eq!(resample(&candles, Interval::SECOND), candles);
    }

    #[test]
    fn test_resample_is_associative() {
        let candles = second_series(1_704_067_200, 3_600);

        for (x, y) in [(5, 60), (60, 300), (30, 3_600), (60, 60)] {
            let staged = resample(&resample(&candles, interval(x)), interval(y));
            let direct = resample(&candles, interval(y));
            assert_eq!(staged, direct, "x={x} y={y}");
        }
    }

    #[test]
    fn test_resample_ignores_input_order() {
        let candles = second_series(0, 10);
        let mut shuffled = candles.clone();
        shuffled.reverse();
        shuffled.swap(2, 7);

        assert_eq!(resample(&shuffled, interval(5)), resample(&candles, interval(5)));
    }

    #[test]
    fn test_resample_empty() {
        assert!(resample(&[], Interval::MINUTE).is_empty());
    }

    #[test]
    fn test_resample_range_bounds() {
        let candles = second_series(0, 10);
        let result = resample_range(&candles, interval(10), at(2), at(6));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].timestamp, at(0));
        assert_eq!(result[0].open, candles[2].open);
        assert_eq!(result[0].close, candles[5].close);
    }

    #[test]
    fn test_resample_matches_direct_aggregation() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let trades: Vec<_> = (0..500)
            .map(|i: i64| {
                let side = if i % 3 == 0 { Side::Sell } else { Side::Buy };
                let price = dec!(100) + Decimal::from((i * 13) % 17) / dec!(10);
                Trade::new(start + TimeDelta::milliseconds(i * 377), side, dec!(0.01), price)
            })
            .collect();

        let seconds = aggregate_trades("bybit", "BTCUSD", &trades, Interval::SECOND);
        let minutes = aggregate_trades("bybit", "BTCUSD", &trades, Interval::MINUTE);
        assert_eq!(resample(&seconds, Interval::MINUTE), minutes);
    }
}
