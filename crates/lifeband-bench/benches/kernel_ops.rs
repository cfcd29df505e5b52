//! Criterion micro-benchmarks for the transition kernel and band storage.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use lifeband_bench::seeded_band;
use lifeband_core::HaloSide;
use lifeband_kernel::{RowEdges, Rule, TransitionKernel};

fn bench_step_120x480(c: &mut Criterion) {
    let mut band = seeded_band(120, 480, 42).unwrap();
    let kernel = TransitionKernel::new(Rule::CONWAY, 1, RowEdges::BOTH);

    c.bench_function("kernel_step_120x480", |b| {
        b.iter(|| {
            let stats = kernel.step(&mut band);
            band.commit();
            black_box(stats);
        });
    });
}

fn bench_commit_120x480(c: &mut Criterion) {
    let mut band = seeded_band(120, 480, 42).unwrap();

    c.bench_function("band_commit_120x480", |b| {
        b.iter(|| {
            band.commit();
            black_box(&band);
        });
    });
}

fn bench_write_halo_480(c: &mut Criterion) {
    let mut band = seeded_band(120, 480, 42).unwrap();
    let row = band.boundary_row(HaloSide::Bottom).to_vec();

    c.bench_function("band_write_halo_480", |b| {
        b.iter(|| {
            band.write_halo(HaloSide::Top, black_box(&row)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_step_120x480,
    bench_commit_120x480,
    bench_write_halo_480
);
criterion_main!(benches);
