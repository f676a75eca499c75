//! Criterion benchmarks for the Surfer step simulator.
//!
//! Benchmark groups:
//! - `full_run`: the default ten-week Hermosa Beach to Hawaii route, hourly
//! - `single_step`: one pipeline step from a daylight and a night state
//! - `snapshot`: encoding and decoding a ten-week trajectory
//! - `sweep`: eight independent one-week scenarios

use chrono::TimeDelta;
use criterion::{Criterion, criterion_group, criterion_main};
use surfer_core::config::SimConfig;
use surfer_core::driver::run;
use surfer_core::log_sink::NullSink;
use surfer_core::pipeline::Pipeline;
use surfer_core::rng::SimRng;
use surfer_core::step::Step;
use surfer_core::sweep::{Scenario, run_sweep};
use surfer_core::test_utils::*;
use surfer_core::trajectory::Trajectory;

fn ten_week_run() -> Trajectory {
    run(&long_run(10), &mut SimRng::new(42), &mut NullSink).unwrap()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");
    group.sample_size(20);

    let config = long_run(10);

    group.bench_function("ten_weeks_hourly", |b| {
        b.iter(|| {
            run(&config, &mut SimRng::new(42), &mut NullSink).unwrap();
        });
    });

    group.finish();
}

fn bench_single_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_step");

    let pipeline = Pipeline::default();
    let day: SimConfig = equator_run(noon(), TimeDelta::hours(1));
    let night: SimConfig = equator_run(midnight(), TimeDelta::hours(1));
    let day_origin = Step::origin(&day);
    let night_origin = Step::origin(&night);
    let mut rng = SimRng::new(7);

    group.bench_function("powered", |b| {
        b.iter(|| {
            pipeline.calculate(&day_origin, &day, &mut rng).unwrap();
        });
    });

    group.bench_function("coasting", |b| {
        b.iter(|| {
            pipeline.calculate(&night_origin, &night, &mut rng).unwrap();
        });
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    group.sample_size(30);

    let trajectory = ten_week_run();
    let bytes = trajectory.to_snapshot().unwrap();

    group.bench_function("encode_ten_weeks", |b| {
        b.iter(|| {
            trajectory.to_snapshot().unwrap();
        });
    });

    group.bench_function("decode_ten_weeks", |b| {
        b.iter(|| {
            Trajectory::from_snapshot(&bytes).unwrap();
        });
    });

    group.bench_function("state_hash_ten_weeks", |b| {
        b.iter(|| trajectory.state_hash());
    });

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.sample_size(10);

    let scenarios: Vec<_> = (0..8)
        .map(|seed| Scenario::new(format!("seed_{seed}"), long_run(1), seed))
        .collect();

    group.bench_function("eight_one_week_runs", |b| {
        b.iter(|| {
            run_sweep(&scenarios);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_full_run,
    bench_single_step,
    bench_snapshot,
    bench_sweep
);
criterion_main!(benches);
