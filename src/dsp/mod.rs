//! Low-level DSP primitives behind the string model.
//!
//! Everything here stays focused on the signal-processing math. Allocation
//! happens only while a string is being built; once constructed, the per-sample
//! path is allocation-free and realtime-safe.

/// Circular delay line seeded with a random noise floor.
pub mod delay;
/// Pluck excitation shapes fed into the string.
pub mod excitation;
/// Four-point cubic interpolation.
pub mod interpolation;
/// Arbitrary-ratio resampling of excitation buffers.
pub mod resample;
/// Bidirectional waveguide model of a plucked string.
pub mod string;

pub use excitation::ExcitationShape;
pub use string::{StringGeometry, VibratingString};
