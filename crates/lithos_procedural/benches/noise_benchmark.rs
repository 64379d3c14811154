//! Benchmark for noise generation performance.
//!
//! Run with: cargo bench --package lithos_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lithos_procedural::noise::{NoiseField, WorldSeed};

fn benchmark_single_octave(c: &mut Criterion) {
    let noise = NoiseField::setup(WorldSeed::new(42), 1, 1.0, 0.5).unwrap();

    c.bench_function("single_octave_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.sample(black_box(x), 0.0, black_box(x * 0.7)))
        });
    });
}

fn benchmark_fractal(c: &mut Criterion) {
    let noise = NoiseField::setup(WorldSeed::new(42), 4, 1.0, 0.5).unwrap();

    c.bench_function("fractal_noise_4_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(noise.generate(black_box(x), 0.0, black_box(x * 0.7)))
        });
    });
}

fn benchmark_column_heights(c: &mut Criterion) {
    let noise = NoiseField::setup(WorldSeed::new(42), 4, 1.0, 0.5).unwrap();

    let mut group = c.benchmark_group("column_heights");
    group.throughput(Throughput::Elements(256 * 256));
    group.sample_size(20);

    group.bench_function("256x256_columns", |b| {
        b.iter(|| {
            for z in 0..256 {
                for x in 0..256 {
                    black_box(noise.generate(f64::from(x) / 64.0, 0.0, f64::from(z) / 64.0));
                }
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_octave,
    benchmark_fractal,
    benchmark_column_heights
);
criterion_main!(benches);
