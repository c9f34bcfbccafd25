//! Throughput of the ingestion and export pipeline stages.
//!
//! Run with: `cargo bench --package tamagoyaki-bench`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tamagoyaki_aggregate::{aggregate_trades, resample};
use tamagoyaki_bench::{bybit_csv, synthetic_trades};
use tamagoyaki_fetch::parse_trades;
use tamagoyaki_store::{CandleStore, MemoryStore, SqliteStore};
use tamagoyaki_types::Interval;
use tempfile::TempDir;

const TRADES_PER_DAY: usize = 500_000;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

fn parse_benchmark(c: &mut Criterion) {
    let csv = bybit_csv("BTCUSD", &synthetic_trades(day(), 100_000, 1));

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(csv.len() as u64));
    group.bench_function("bybit_csv", |b| b.iter(|| parse_trades(black_box(&csv)).unwrap()));
    group.finish();
}

fn aggregate_benchmark(c: &mut Criterion) {
    let trades = synthetic_trades(day(), TRADES_PER_DAY, 2);

    let mut group = c.benchmark_group("aggregate");
    group.throughput(Throughput::Elements(trades.len() as u64));
    for interval in [Interval::SECOND, Interval::MINUTE, Interval::HOUR] {
        group.bench_with_input(
            BenchmarkId::from_parameter(interval),
            &interval,
            |b, interval| {
                b.iter(|| aggregate_trades("bybit", "BTCUSD", black_box(&trades), *interval));
            },
        );
    }
    group.finish();
}

fn resample_benchmark(c: &mut Criterion) {
    let trades = synthetic_trades(day(), TRADES_PER_DAY, 3);
    let seconds = aggregate_trades("bybit", "BTCUSD", &trades, Interval::SECOND);

    let mut group = c.benchmark_group("resample");
    group.throughput(Throughput::Elements(seconds.len() as u64));
    for interval in [Interval::MINUTE, Interval::HOUR, Interval::DAY] {
        group.bench_with_input(
            BenchmarkId::from_parameter(interval),
            &interval,
            |b, interval| b.iter(|| resample(black_box(&seconds), *interval)),
        );
    }
    group.finish();
}

fn store_benchmark(c: &mut Criterion) {
    let trades = synthetic_trades(day(), 100_000, 4);
    let candles = aggregate_trades("bybit", "BTCUSD", &trades, Interval::SECOND);

    let mut group = c.benchmark_group("insert_day");
    group.sample_size(10);
    group.throughput(Throughput::Elements(candles.len() as u64));

    group.bench_function("memory", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new();
            store.insert_day("bybit", "BTCUSD", day(), &candles).unwrap()
        });
    });

    group.bench_function("sqlite", |b| {
        b.iter_batched(
            || {
                let dir = TempDir::new().unwrap();
                let store = SqliteStore::open(dir.path().join("BTCUSD.db")).unwrap();
                (dir, store)
            },
            |(_dir, mut store)| store.insert_day("bybit", "BTCUSD", day(), &candles).unwrap(),
            criterion::BatchSize::PerIteration,
        );
    });

    group.finish();
}

criterion_group!(
    benches,
    parse_benchmark,
    aggregate_benchmark,
    resample_benchmark,
    store_benchmark
);
criterion_main!(benches);
