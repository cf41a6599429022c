use criterion::{criterion_group, criterion_main, Criterion};
use mri_protocol::protocol::{Column, Protocol};
use mri_protocol::timings::{b_value, small_delta};
use ndarray::Array1;
use std::hint::black_box;

fn multi_shell_b(n: usize) -> Array1<f64> {
    let shells = [0.0, 1e9, 2e9, 3e9];
    Array1::from_iter((0..n).map(|i| shells[i % shells.len()]))
}

fn bench_small_delta_root(c: &mut Criterion) {
    let b = b_value(0.04, 0.02, 0.01);
    c.bench_function("small_delta_bisection", |bench| {
        bench.iter(|| small_delta(black_box(b), black_box(0.04), black_box(0.02)))
    });
}

fn bench_cascade(c: &mut Criterion) {
    let n = 256;
    let b = multi_shell_b(n);
    let big = Array1::from_elem(n, 0.04);
    let g = Array1::from_elem(n, 0.08);

    let b_only = Protocol::default().with_column(Column::B, b.clone()).unwrap();
    let solve_small = Protocol::default()
        .with_column(Column::B, b)
        .unwrap()
        .with_column(Column::BigDelta, big)
        .unwrap()
        .with_column(Column::G, g)
        .unwrap();

    let mut group = c.benchmark_group("sequence_timings_256");
    group.bench_function("estimate_from_b", |bench| {
        bench.iter(|| black_box(b_only.sequence_timings().unwrap()))
    });
    group.bench_function("solve_small_delta", |bench| {
        bench.iter(|| black_box(solve_small.sequence_timings().unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_small_delta_root, bench_cascade);
criterion_main!(benches);
