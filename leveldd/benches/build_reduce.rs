//! Measures the cost of the two hottest passes this crate has: the
//! breadth-first builder and the bottom-up reducer, across a spread of
//! combination sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use leveldd::builder::build;
use leveldd::progress::NullProgress;
use leveldd::reduce::{reduce, ReduceMode};
use leveldd::specs::combination::Combination;
use leveldd::specs::grid_path::GridPath;

fn combination_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("combination build+reduce");
    for &n in &[10u32, 16, 22] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut spec = Combination::new(n, n as i32 / 2);
                let mut progress = NullProgress;
                let mut dag = build::<2, _>(&mut spec, &mut progress).unwrap();
                reduce(&mut dag.table, &mut dag.roots, ReduceMode::Zdd).unwrap();
                dag
            });
        });
    }
    group.finish();
}

fn grid_path_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid path build+reduce");
    for &n in &[3u32, 4, 5] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut spec = GridPath::new(n + 1, n + 1);
                let mut progress = NullProgress;
                let mut dag = build::<2, _>(&mut spec, &mut progress).unwrap();
                reduce(&mut dag.table, &mut dag.roots, ReduceMode::Zdd).unwrap();
                dag
            });
        });
    }
    group.finish();
}

criterion_group!(benches, combination_benchmarks, grid_path_benchmarks);
criterion_main!(benches);
