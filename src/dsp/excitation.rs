use std::f32::consts::TAU;

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Single-cycle pluck shapes.
///
/// Whatever length a shape is generated at, the string resamples it to its
/// own length, so a 64-frame shape is plenty.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcitationShape {
    Sine,
    Triangle,
    Saw,
    Square,
    Noise,
    Impulse,
}

impl ExcitationShape {
    /// Generate `len` frames of this shape, peaking at ±1.
    ///
    /// Only `Noise` draws from `rng`.
    pub fn generate<R: Rng + ?Sized>(self, len: usize, rng: &mut R) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let phase = i as f32 / len as f32;
                match self {
                    ExcitationShape::Sine => (TAU * phase).sin(),
                    ExcitationShape::Triangle => {
                        if phase < 0.25 {
                            4.0 * phase
                        } else if phase < 0.75 {
                            2.0 - 4.0 * phase
                        } else {
                            4.0 * phase - 4.0
                        }
                    }
                    ExcitationShape::Saw => 1.0 - 2.0 * phase,
                    ExcitationShape::Square => {
                        if phase < 0.5 {
                            1.0
                        } else {
                            -1.0
                        }
                    }
                    ExcitationShape::Noise => rng.gen_range(-1.0..=1.0),
                    ExcitationShape::Impulse => {
                        if i == 0 {
                            1.0
                        } else {
                            0.0
                        }
                    }
                }
            })
            .collect()
    }
}

/// Scale `shape` so its largest magnitude is 1. Silence is left alone.
pub fn normalize(shape: &mut [f32]) {
    let peak = shape.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    if peak > f32::EPSILON {
        let gain = 1.0 / peak;
        for s in shape.iter_mut() {
            *s *= gain;
        }
    }
}

/// Three-point moving average, treating the shape as one cycle.
///
/// Softens corners (square, saw) into a duller pluck.
pub fn smooth(shape: &mut [f32]) {
    let len = shape.len();
    if len < 3 {
        return;
    }

    let original = shape.to_vec();
    for (i, s) in shape.iter_mut().enumerate() {
        let prev = original[(i + len - 1) % len];
        let next = original[(i + 1) % len];
        *s = (prev + original[i] + next) / 3.0;
    }
}
