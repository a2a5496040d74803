use crate::foundation::math::step;
use crate::noise::hash::hash_dir3;
use glam::{DVec3, DVec4, Vec3Swizzles};

const SKEW: f64 = 1.0 / 3.0;
const UNSKEW: f64 = 1.0 / 6.0;
const FALLOFF: f64 = 0.5;
/// Brings the summed kernel contributions to roughly `[-1, 1]`.
pub const SIMPLEX_SCALE: f64 = 128.0;

/// 3D simplex gradient noise, practically in `[-1, 1]`.
///
/// The point is skewed onto the tetrahedral lattice, the containing simplex is picked from the
/// ordering of the cell-local components, and each of the four corners contributes
/// `max(0, 0.5 - |d|²)⁴ * dot(g, d)` with a hashed direction `g`. The kernel reaches zero before the
/// next cell's corners come into play, so both the value and its gradient are continuous.
pub fn simplex3(p: DVec3) -> f64 {
    let ip = (p + DVec3::splat(p.dot(DVec3::splat(SKEW)))).floor();
    let p0 = p - ip + DVec3::splat(ip.dot(DVec3::splat(UNSKEW)));

    // f = (x >= y, y >= z, z > x). Ties resolve x before y before z so points on the lattice
    // still select a proper simplex.
    let f = DVec3::new(
        step(p0.y, p0.x),
        step(p0.z, p0.y),
        1.0 - step(p0.z, p0.x),
    );
    let ff = f * f.zxy();

    // v1: unit step along the largest component, v2: along the two largest.
    let v1 = f - ff;
    let v2 = ff - f.zxy() + DVec3::ONE;

    let p1 = p0 - v1 + DVec3::splat(UNSKEW);
    let p2 = p0 - v2 + DVec3::splat(2.0 * UNSKEW);
    let p3 = p0 - DVec3::ONE + DVec3::splat(3.0 * UNSKEW);

    let d = DVec4::new(
        FALLOFF - p0.length_squared(),
        FALLOFF - p1.length_squared(),
        FALLOFF - p2.length_squared(),
        FALLOFF - p3.length_squared(),
    )
    .max(DVec4::ZERO);
    let d = d * d;
    let d = d * d;

    let g = DVec4::new(
        p0.dot(hash_dir3(ip)),
        p1.dot(hash_dir3(ip + v1)),
        p2.dot(hash_dir3(ip + v2)),
        p3.dot(hash_dir3(ip + DVec3::ONE)),
    );

    g.dot(d) * SIMPLEX_SCALE
}

/// [`simplex3`] remapped to `[0, 1]` for use as a blend factor.
pub fn simplex3_unit(p: DVec3) -> f64 {
    (simplex3(p) * 0.5 + 0.5).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/noise/simplex.rs"]
mod tests;
