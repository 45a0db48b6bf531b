//! Benchmarks for the plucked string.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use vibed_dsp::{dsp::ExcitationShape, EngineConfig, StringParams, VibratingString};

use crate::BLOCK_SIZES;

pub fn bench_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/string");
    let engine = EngineConfig::default();
    let mut rng = Pcg32::seed_from_u64(1);
    let shape = ExcitationShape::Triangle.generate(64, &mut rng);

    // Construction cost grows with string length
    for &pitch in &[880.0f32, 220.0, 55.0] {
        let params = StringParams::new(pitch, 48_000).with_randomize(0.05);
        group.bench_with_input(
            BenchmarkId::new("construct", pitch as u32),
            &params,
            |b, params| {
                b.iter(|| VibratingString::new(black_box(params), &engine, &shape, false, &mut rng))
            },
        );
    }

    // Per-sample cost grows with oversampling, not with pitch
    for &oversample in &[1u32, 4] {
        for &size in BLOCK_SIZES {
            let params = StringParams::new(220.0, 48_000).with_oversample(oversample);
            let Ok(mut string) = VibratingString::new(&params, &engine, &shape, false, &mut rng)
            else {
                continue;
            };
            let mut buffer = vec![0.0f32; size];
            group.bench_with_input(
                BenchmarkId::new(format!("render_x{oversample}"), size),
                &size,
                |b, _| b.iter(|| string.render(black_box(&mut buffer))),
            );
        }
    }

    group.finish();
}
