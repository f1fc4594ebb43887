//! Compress/decompress throughput over clustered int64 and float64 columns.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use tscodec::{compress_float64, compress_int64, decompress_float64, decompress_int64};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

// (name, base, range): the spread of the jitter decides how wide the packed fields get
const INT_CASES: [(&str, i64, i64); 3] = [
    ("narrow", 10_000, 10),
    ("medium", 1_000_000, 1_000),
    ("wide", 10_000_000, 1_000_000),
];

const FLOAT_CASES: [(&str, f64, i64); 3] = [
    ("narrow", 1.12213, 10),
    ("medium", 10000.23354, 1_000),
    ("wide", 10000000.23254, 1_000_000),
];

fn bench_int64(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);

    for (case, base, range) in INT_CASES {
        let mut group = c.benchmark_group(format!("Int64_{case}"));
        for size in SIZES {
            let input: Vec<i64> = (0..size).map(|_| base + rng.gen_range(0..range)).collect();
            let encoded = compress_int64(&input);
            group.throughput(Throughput::Bytes((size * 8) as u64));

            group.bench_with_input(BenchmarkId::new("compress", size), &input, |b, i| {
                b.iter(|| compress_int64(black_box(i)));
            });
            group.bench_with_input(BenchmarkId::new("decompress", size), &encoded, |b, e| {
                b.iter(|| decompress_int64(black_box(e)).unwrap());
            });
        }
        group.finish();
    }
}

fn bench_float64(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);

    for (case, base, range) in FLOAT_CASES {
        let mut group = c.benchmark_group(format!("Float64_{case}"));
        for size in SIZES {
            let input: Vec<f64> = (0..size)
                .map(|_| base + rng.gen_range(0..range) as f64)
                .collect();
            let encoded = compress_float64(&input);
            group.throughput(Throughput::Bytes((size * 8) as u64));

            group.bench_with_input(BenchmarkId::new("compress", size), &input, |b, i| {
                b.iter(|| compress_float64(black_box(i)));
            });
            group.bench_with_input(BenchmarkId::new("decompress", size), &encoded, |b, e| {
                b.iter(|| decompress_float64(black_box(e)).unwrap());
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_int64, bench_float64);
criterion_main!(benches);
