use crate::foundation::math::{hermite, mix};
use crate::noise::hash::{hash12, hash13};
use glam::{DVec2, DVec3};

/// Smooth value noise over the integer lattice, in `[0, 1]`.
///
/// Corner hashes are blended with the smoothstep curve, so the field is C¹ across cell edges. At an
/// integer coordinate the result is exactly that corner's [`hash12`].
pub fn value_noise2(p: DVec2) -> f64 {
    let ip = p.floor();
    let f = p - ip;
    let u = DVec2::new(hermite(f.x), hermite(f.y));

    let a = hash12(ip);
    let b = hash12(ip + DVec2::X);
    let c = hash12(ip + DVec2::Y);
    let d = hash12(ip + DVec2::ONE);

    mix(mix(a, b, u.x), mix(c, d, u.x), u.y)
}

/// 3D value noise; trilinear blend of the eight [`hash13`] corners.
pub fn value_noise3(p: DVec3) -> f64 {
    let ip = p.floor();
    let f = p - ip;
    let u = DVec3::new(hermite(f.x), hermite(f.y), hermite(f.z));

    let corner = |dx: f64, dy: f64, dz: f64| hash13(ip + DVec3::new(dx, dy, dz));

    let x00 = mix(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), u.x);
    let x10 = mix(corner(0.0, 1.0, 0.0), corner(1.0, 1.0, 0.0), u.x);
    let x01 = mix(corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), u.x);
    let x11 = mix(corner(0.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), u.x);

    mix(mix(x00, x10, u.y), mix(x01, x11, u.y), u.z)
}

#[cfg(test)]
#[path = "../../tests/unit/noise/value.rs"]
mod tests;
