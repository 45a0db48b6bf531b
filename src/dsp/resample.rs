use crate::dsp::interpolation::cubic_interpolate;

/*
Excitation Resampling
=====================

A pluck shape is drawn once, at whatever length was convenient, but a string
needs exactly one excitation sample per delay-line slot. Resampling stretches
or squeezes the shape to the string's length.

  source   src_len frames       ●   ●   ●   ●   ●   ●
  dest     dst_len frames       ○  ○  ○  ○  ○  ○  ○  ○  ○

Each destination frame i maps back to a fractional source position

    p = i * src_len / dst_len

and is read off a cubic through the four source frames around p:

    source[k-1], source[k], source[k+1], source[k+2]     k = floor(p)

The window has to stay inside the source, so k is clamped to [1, src_len-3]
and the offset becomes f = p - k. Near the edges f leaves [0, 1): at the
start it reaches back to -1 (which lands exactly on source[0]), at the end it
runs up to just under 3 (a slight extrapolation past the last frame). That
bias at the extremes is accepted; a pluck shape is quiet at its edges anyway.
*/

/// Resample `source` into `dest` with four-point cubic interpolation.
///
/// The output length is `dest.len()`, whatever `source.len()` is. An empty
/// source leaves silence; sources shorter than four frames repeat their edge
/// samples to fill the interpolation window.
pub fn resample(source: &[f32], dest: &mut [f32]) {
    let src_len = source.len();
    let dst_len = dest.len();

    if src_len == 0 {
        dest.fill(0.0);
        return;
    }

    let last = src_len - 1;
    let max_k = src_len.saturating_sub(3).max(1);
    let at = |i: usize| source[i.min(last)];
    let step = src_len as f64 / dst_len as f64;

    for (i, out) in dest.iter_mut().enumerate() {
        let position = i as f64 * step;
        let k = (position as usize).clamp(1, max_k);
        let frac = (position - k as f64) as f32;

        *out = cubic_interpolate(at(k - 1), at(k), at(k + 1), at(k + 2), frac);
    }
}

/// Allocate a buffer of `len` frames and resample `source` into it.
pub fn resampled(source: &[f32], len: usize) -> Vec<f32> {
    let mut out = vec![0.0; len];
    resample(source, &mut out);
    out
}
