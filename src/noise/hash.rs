use crate::foundation::math::fract;
use glam::{DVec2, DVec3, Vec3Swizzles};

const K2: DVec2 = DVec2::new(12.9898, 78.233);
const K3: DVec3 = DVec3::new(12.9898, 78.233, 37.719);
const SPREAD: f64 = 43758.5453;
const DIR_SPREAD: DVec3 = DVec3::new(1.0, 99.0, 9999.0);

/// Hash a 2D coordinate to `[0, 1)`.
///
/// Not cryptographic; decorrelated enough for visual noise only.
#[inline]
pub fn hash12(p: DVec2) -> f64 {
    fract(p.dot(K2).sin() * SPREAD)
}

/// Hash a 3D coordinate to `[0, 1)`.
#[inline]
pub fn hash13(p: DVec3) -> f64 {
    fract(p.dot(K3).sin() * SPREAD)
}

/// Hash a 3D lattice point to a direction with components in `[-0.5, 0.5)`.
///
/// The input is folded to 2D with a fixed linear map, hashed once, and the scalar is spread over
/// three lanes at different magnitudes.
#[inline]
pub fn hash_dir3(p: DVec3) -> DVec3 {
    let h = hash12(p.xy() + p.zz() * 100.0);
    let s = DIR_SPREAD * h;
    DVec3::new(fract(s.x), fract(s.y), fract(s.z)) - DVec3::splat(0.5)
}

#[cfg(test)]
#[path = "../../tests/unit/noise/hash.rs"]
mod tests;
