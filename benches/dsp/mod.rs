//! Benchmarks for low-level DSP primitives.

mod delay;
mod resample;
mod string;

pub use delay::bench_delay;
pub use resample::bench_resample;
pub use string::bench_string;
