use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::raymarch::Ray;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Pinhole camera looking from `eye` at `target`.
///
/// Screen coordinates are centered and aspect-corrected: `y` spans `[-0.5, 0.5]` upwards and `x`
/// spans half the aspect ratio either side of zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookAtCamera {
    /// Ray origin.
    pub eye: DVec3,
    /// Point at the center of the frame.
    pub target: DVec3,
    /// World up hint.
    pub up: DVec3,
    /// Distance from the eye to the image plane.
    pub focal_length: f64,
}

impl Default for LookAtCamera {
    fn default() -> Self {
        Self {
            eye: DVec3::new(0.0, 2.0, -4.0),
            target: DVec3::ZERO,
            up: DVec3::Y,
            focal_length: 1.0,
        }
    }
}

/// Orthonormal camera frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    /// View direction.
    pub forward: DVec3,
    /// Screen `+x`.
    pub right: DVec3,
    /// Screen `+y`.
    pub up: DVec3,
}

impl LookAtCamera {
    /// Camera at `eye` looking at `target` with the default up hint and focal length.
    pub fn new(eye: DVec3, target: DVec3) -> Self {
        Self {
            eye,
            target,
            ..Self::default()
        }
    }

    /// Reject degenerate placements.
    pub fn validate(&self) -> ProcfieldResult<()> {
        if !self.eye.is_finite() || !self.target.is_finite() || !self.up.is_finite() {
            return Err(ProcfieldError::validation("camera vectors must be finite"));
        }
        if !(self.focal_length.is_finite() && self.focal_length > 0.0) {
            return Err(ProcfieldError::validation(
                "camera focal_length must be finite and > 0",
            ));
        }
        let forward = (self.target - self.eye).normalize_or_zero();
        if forward == DVec3::ZERO {
            return Err(ProcfieldError::validation(
                "camera eye and target must differ",
            ));
        }
        if self.up.cross(forward).length_squared() < 1e-12 {
            return Err(ProcfieldError::validation(
                "camera up must not be parallel to the view direction",
            ));
        }
        Ok(())
    }

    /// Left-handed frame: `right = up x forward`, `up = forward x right`.
    pub fn basis(&self) -> CameraBasis {
        let forward = (self.target - self.eye).normalize_or_zero();
        let right = self.up.cross(forward).normalize_or_zero();
        let up = forward.cross(right);
        CameraBasis { forward, right, up }
    }

    /// Primary ray through a centered screen coordinate.
    pub fn ray(&self, screen: DVec2) -> Ray {
        let b = self.basis();
        let dir = b.forward * self.focal_length + b.right * screen.x + b.up * screen.y;
        Ray::new(self.eye, dir)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
