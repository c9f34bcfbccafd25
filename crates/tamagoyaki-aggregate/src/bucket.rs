//! Fixed-interval time bucketing.

use chrono::{DateTime, TimeDelta, Utc};
use tamagoyaki_types::Interval;

/// Returns the start of the bucket containing `secs` (seconds since epoch).
///
/// `bucket_epoch(t, n) == t - (t mod n)`, using the Euclidean remainder so
/// instants before the epoch still land on the bucket at or below them.
#[must_use]
pub const fn bucket_epoch(secs: i64, interval: Interval) -> i64 {
    secs - secs.rem_euclid(interval.secs())
}

/// Returns the start of the bucket containing `timestamp`.
///
/// Sub-second precision is truncated, never rounded.
#[must_use]
pub fn bucket_start(timestamp: DateTime<Utc>, interval: Interval) -> DateTime<Utc> {
    let secs = timestamp.timestamp();
    let offset = secs - bucket_epoch(secs, interval);
    timestamp
        - TimeDelta::seconds(offset)
        - TimeDelta::nanoseconds(i64::from(timestamp.timestamp_subsec_nanos()))
}
