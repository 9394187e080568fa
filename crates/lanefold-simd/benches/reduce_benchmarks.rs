//! Benchmarks for vector reductions and elementwise kernels
//!
//! Each group compares the vector path against the equivalent scalar loop.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lanefold_simd::prelude::*;

/// Generate test data for benchmarks
fn generate_test_data(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i as f32 * 0.1) % 10.0 - 5.0).collect()
}

fn bench_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_sum");

    for size in [100usize, 1003, 10_000, 100_000] {
        let data = generate_test_data(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("portable", size), &data, |b, data| {
            b.iter(|| reduce_with::<F32x8, _>(&SumOp, black_box(data)));
        });

        group.bench_with_input(BenchmarkId::new("native", size), &data, |b, data| {
            b.iter(|| reduce_with::<NativeF32, _>(&SumOp, black_box(data)));
        });

        group.bench_with_input(BenchmarkId::new("scalar", size), &data, |b, data| {
            b.iter(|| black_box(data).iter().sum::<f32>());
        });
    }

    group.finish();
}

fn bench_max(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_max");

    for size in [1003usize, 100_000] {
        let data = generate_test_data(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("native", size), &data, |b, data| {
            b.iter(|| reduce_with::<NativeF32, _>(&MaxOp, black_box(data)));
        });

        group.bench_with_input(BenchmarkId::new("scalar", size), &data, |b, data| {
            b.iter(|| black_box(data).iter().copied().fold(f32::NEG_INFINITY, f32::max));
        });
    }

    group.finish();
}

fn bench_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("elementwise_mul");

    for size in [1024usize, 10_000, 65_536] {
        let a = generate_test_data(size);
        let b = generate_test_data(size);
        let mut out = vec![0.0f32; size];
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(BenchmarkId::new("plain", size), |bencher| {
            bencher.iter(|| mul::<NativeF32>(black_box(&a), black_box(&b), &mut out));
        });

        group.bench_function(BenchmarkId::new("unrolled", size), |bencher| {
            bencher.iter(|| mul_unrolled::<NativeF32>(black_box(&a), black_box(&b), &mut out));
        });

        group.bench_function(BenchmarkId::new("scalar", size), |bencher| {
            bencher.iter(|| {
                for ((x, y), o) in a.iter().zip(&b).zip(out.iter_mut()) {
                    *o = black_box(*x * *y);
                }
            });
        });
    }

    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_parallel_sum(c: &mut Criterion) {
    let data = generate_test_data(1 << 22);
    let mut group = c.benchmark_group("reduce_sum_parallel");
    group.throughput(Throughput::Elements(data.len() as u64));

    for chunk in [1 << 14, 1 << 16, 1 << 18] {
        group.bench_with_input(BenchmarkId::new("chunk", chunk), &chunk, |b, &chunk| {
            b.iter(|| par_reduce_with::<NativeF32, _>(&SumOp, black_box(&data), chunk));
        });
    }

    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_parallel_sum(_c: &mut Criterion) {}

criterion_group!(benches, bench_sum, bench_max, bench_product, bench_parallel_sum);
criterion_main!(benches);
