//! Benchmarks for elapsed-time prediction on recorded laps
//!
//! A lap of 5 km sampled at 60Hz over 90 s holds roughly 5400 samples; the
//! prediction runs four times per lap data tick, once per reference lap.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lapdelta::telemetry::{LapSamples, predict};
use std::hint::black_box;

fn sampled_lap(samples: u32, track_length: f32, lap_ms: u32) -> LapSamples {
    (1..=samples)
        .map(|i| (track_length * i as f32 / samples as f32, lap_ms * i / samples))
        .collect()
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("predict");

    for samples in [600u32, 5_400, 20_000] {
        let lap = sampled_lap(samples, 5_000.0, 90_000);
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("mid_lap", samples), &lap, |b, lap| {
            b.iter(|| black_box(predict(black_box(lap), black_box(2_501.3))))
        });
        group.bench_with_input(BenchmarkId::new("past_end", samples), &lap, |b, lap| {
            b.iter(|| black_box(predict(black_box(lap), black_box(5_200.0))))
        });
    }

    group.finish();
}

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");
    group.throughput(Throughput::Elements(5_400));

    group.bench_function("full_lap_60hz", |b| {
        b.iter(|| {
            let mut lap = LapSamples::new();
            for i in 1..=5_400u32 {
                lap.record(black_box(i as f32 * 0.925), black_box(i * 16));
            }
            black_box(lap)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_predict, bench_record);
criterion_main!(benches);
