// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Benchmarks for `PatternSeeker::process`.
//!
//! Measures per-element step throughput at multiple input sizes for both
//! spawn policies, on a three-stage "level, rise, rise" pattern over a
//! synthetic saw-tooth series that completes roughly once per period.
#![allow(missing_docs, clippy::cast_possible_truncation)]

use std::num::NonZeroU32;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seeker::{
    Item, PatternDescriptor, PatternSeeker, SeekerEvent, SpawnPolicy, Stage, StageActions,
};

fn make_series(n: usize) -> Vec<i64> {
    (0..n).map(|i| (i % 16) as i64).collect()
}

fn rise(v: &i64, _: u64, prev: Option<&i64>) -> bool {
    prev.is_some_and(|p| p + 1 == *v)
}

/// Counts visited elements and progresses on a rise over the previous one.
fn count_and_rise(item: &Item<i64>, actions: &mut StageActions<'_, i64, u32>) {
    actions.set(|seen| seen + 1);
    let previous = actions.lookback().iter().rev().nth(1).map(|i| &i.value);
    if rise(&item.value, item.index, previous) {
        actions.progress();
    }
}

fn make_pattern(spawn: SpawnPolicy) -> PatternDescriptor<i64, u32> {
    let patience = NonZeroU32::new(4).unwrap_or(NonZeroU32::MIN);
    PatternDescriptor::new(0)
        .stage(Stage::when(|v: &i64, _, _| *v == 3))
        .stage(Stage::when(rise).patience(patience))
        .stage(Stage::from_fn(count_and_rise).patience(patience))
        .lookback(8)
        .spawn(spawn)
}

fn bench_process(c: &mut Criterion) {
    for (name, spawn) in [
        ("single", SpawnPolicy::Single),
        ("parallel", SpawnPolicy::Parallel),
    ] {
        let mut group = c.benchmark_group(format!("seeker_process_{name}"));

        for &n in &[100_usize, 1_000, 10_000, 100_000, 1_000_000] {
            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                let series = make_series(n);
                b.iter(|| {
                    let mut seeker = PatternSeeker::new(make_pattern(spawn)).unwrap();
                    for v in &series {
                        seeker.process(black_box(*v)).unwrap();
                    }
                    seeker.processed()
                });
            });
        }

        group.finish();
    }
}

fn bench_process_with_subscribers(c: &mut Criterion) {
    let mut group = c.benchmark_group("seeker_process_subscribed");

    for &n in &[1_000_usize, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let series = make_series(n);
            b.iter(|| {
                let mut seeker = PatternSeeker::new(make_pattern(SpawnPolicy::Parallel)).unwrap();
                seeker.on_any(|_, report| {
                    black_box(report);
                });
                seeker
                    .on(SeekerEvent::PatternComplete, |report| {
                        black_box(report.backtrace.len());
                    })
                    .unwrap();
                seeker.process_all(series.iter().copied()).unwrap();
                seeker.processed()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_process, bench_process_with_subscribers);
criterion_main!(benches);
