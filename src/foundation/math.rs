//! Scalar shading-language helpers shared by noise and graph evaluation.
//!
//! All functions are total over `f64`: NaN inputs produce NaN outputs.

/// Fractional part `x - floor(x)`, kept inside `[0, 1)`.
///
/// For tiny negative inputs the subtraction rounds up to exactly `1.0`; that case folds back to 0.
#[inline]
pub fn fract(x: f64) -> f64 {
    let f = x - x.floor();
    if f >= 1.0 { 0.0 } else { f }
}

/// Linear interpolation `a + (b - a) * t`. Exact at `t == 0`.
#[inline]
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// `0.0` when `x < edge`, `1.0` when `x >= edge`, NaN when either side is NaN.
#[inline]
pub fn step(edge: f64, x: f64) -> f64 {
    if x < edge {
        0.0
    } else if x >= edge {
        1.0
    } else {
        f64::NAN
    }
}

/// Smaller of `a` and `b`; NaN if either is NaN.
#[inline]
pub fn min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Larger of `a` and `b`; NaN if either is NaN.
#[inline]
pub fn max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// `min(max(x, lo), hi)` with NaN propagation from any argument.
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    min(max(x, lo), hi)
}

/// Hermite smoothing `t² (3 - 2t)` of `x` between `e0` and `e1`.
#[inline]
pub fn smoothstep(e0: f64, e1: f64, x: f64) -> f64 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// The smoothstep curve on an already-normalized offset in `[0, 1]`.
#[inline]
pub fn hermite(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
