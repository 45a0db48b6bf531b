//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use vibed_dsp::dsp::delay::DelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");
    let mut rng = Pcg32::seed_from_u64(1);

    // Line lengths in slots
    let lengths: &[usize] = &[
        101,  // 440 Hz at 44.1kHz
        401,  // 110 Hz at 44.1kHz
        3201, // 110 Hz at 44.1kHz, 8x oversampled
    ];

    for &size in BLOCK_SIZES {
        for &length in lengths {
            let mut line = DelayLine::with_noise(length, 0.1, &mut rng);
            group.bench_with_input(
                BenchmarkId::new(format!("read_write_{length}"), size),
                &size,
                |b, &size| {
                    b.iter(|| {
                        for _ in 0..size {
                            let sample = line.read();
                            line.write(black_box(-sample));
                            line.advance();
                        }
                    })
                },
            );

            let line = DelayLine::with_noise(length, 0.1, &mut rng);
            group.bench_with_input(
                BenchmarkId::new(format!("tap_{length}"), size),
                &size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for i in 0..size {
                            sum += line.tap(black_box(i % length));
                        }
                        sum
                    })
                },
            );
        }
    }

    group.finish();
}
