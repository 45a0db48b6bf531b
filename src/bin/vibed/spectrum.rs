//! Pitch estimation for rendered strings
//!
//! One Hann-windowed FFT over the whole render, peak bin refined with
//! parabolic interpolation on the neighbouring magnitudes.

use rustfft::{num_complex::Complex, FftPlanner};

/// Hann window of `len` coefficients.
fn hann(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            if len > 1 {
                let denom = (len - 1) as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos())
            } else {
                1.0
            }
        })
        .collect()
}

/// Frequency in Hz of the strongest component of `samples`, ignoring DC.
///
/// Returns `None` for buffers too short to hold a single non-DC bin or for
/// silence.
pub fn dominant_frequency(samples: &[f32], sample_rate: f32) -> Option<f32> {
    let len = samples.len();
    if len < 4 {
        return None;
    }

    let window = hann(len);
    let mut buffer: Vec<Complex<f32>> = samples
        .iter()
        .zip(&window)
        .map(|(&s, &w)| Complex::new(s * w, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(len);
    fft.process(&mut buffer);

    let half = len / 2;
    let magnitudes: Vec<f32> = buffer[..half].iter().map(|c| c.norm()).collect();

    let (peak, &peak_mag) = magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.total_cmp(b.1))?;
    if peak_mag <= f32::EPSILON {
        return None;
    }

    let mut bin = peak as f32;
    if peak + 1 < half {
        let (a, b, c) = (magnitudes[peak - 1], peak_mag, magnitudes[peak + 1]);
        let denom = a - 2.0 * b + c;
        if denom.abs() > f32::EPSILON {
            bin += 0.5 * (a - c) / denom;
        }
    }

    Some(bin * sample_rate / len as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_sine_frequency() {
        let sample_rate = 44_100.0;
        let samples: Vec<f32> = (0..8192)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sample_rate).sin())
            .collect();

        let freq = dominant_frequency(&samples, sample_rate).unwrap();
        assert!((freq - 440.0).abs() < 2.0, "got {freq}");
    }

    #[test]
    fn silence_has_no_pitch() {
        assert_eq!(dominant_frequency(&[0.0; 1024], 44_100.0), None);
        assert_eq!(dominant_frequency(&[1.0, -1.0], 44_100.0), None);
    }
}
