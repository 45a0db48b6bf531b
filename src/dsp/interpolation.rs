//! Four-point cubic interpolation.

/// Third-order Lagrange interpolation through four evenly spaced points.
///
/// `v0..v3` sit at offsets -1, 0, 1 and 2; `x` is measured from `v1`. Inside
/// `[0, 1]` this interpolates between `v1` and `v2`, and it passes exactly
/// through all four points, so `x = -1` and `x = 2` return `v0` and `v3`.
#[inline]
pub fn cubic_interpolate(v0: f32, v1: f32, v2: f32, v3: f32, x: f32) -> f32 {
    let xm1 = x - 1.0;
    let xm2 = x - 2.0;
    let xp1 = x + 1.0;

    let c0 = -x * xm1 * xm2 * (1.0 / 6.0);
    let c1 = xp1 * xm1 * xm2 * 0.5;
    let c2 = -xp1 * x * xm2 * 0.5;
    let c3 = xp1 * x * xm1 * (1.0 / 6.0);

    c0 * v0 + c1 * v1 + c2 * v2 + c3 * v3
}
