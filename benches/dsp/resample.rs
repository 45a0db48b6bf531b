//! Benchmarks for excitation resampling.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use vibed_dsp::dsp::resample::resample;

pub fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/resample");

    let source: Vec<f32> = (0..64).map(|i| (i as f32 * 0.1).sin()).collect();

    // Destination lengths span the usual string lengths
    for &len in &[101usize, 401, 1603, 6401] {
        let mut dest = vec![0.0f32; len];
        group.bench_with_input(BenchmarkId::new("from_64", len), &len, |b, _| {
            b.iter(|| resample(black_box(&source), black_box(&mut dest)))
        });
    }

    group.finish();
}
