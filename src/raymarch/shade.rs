use crate::foundation::core::Rgb;
use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::foundation::math::max;
use crate::raymarch::march::SurfaceHit;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Directional Lambert light plus a constant ambient term.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    /// Direction towards the light; normalized on use.
    pub direction: DVec3,
    /// Weight of the diffuse term.
    pub diffuse: f64,
    /// Constant floor.
    pub ambient: f64,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            direction: DVec3::new(1.0, 1.0, -1.0),
            diffuse: 0.8,
            ambient: 0.2,
        }
    }
}

impl Lighting {
    /// `max(dot(n, l), 0) * diffuse + ambient`.
    pub fn intensity(&self, normal: DVec3) -> f64 {
        let l = self.direction.normalize_or_zero();
        max(normal.dot(l), 0.0) * self.diffuse + self.ambient
    }

    /// Reject a zero or non-finite direction and non-finite weights.
    pub fn validate(&self) -> ProcfieldResult<()> {
        if !self.direction.is_finite() || self.direction.length_squared() == 0.0 {
            return Err(ProcfieldError::validation(
                "light direction must be finite and non-zero",
            ));
        }
        if !self.diffuse.is_finite() || !self.ambient.is_finite() {
            return Err(ProcfieldError::validation(
                "light weights must be finite",
            ));
        }
        Ok(())
    }
}

/// Lit base color with sine stripes of a highlight color along world `x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylizedSurface {
    /// Color scaled by light intensity.
    pub base: Rgb,
    /// Stripe color.
    pub highlight: Rgb,
    /// Stripes per unit of `x`.
    pub stripe_frequency: f64,
    /// Maximum blend towards the highlight.
    pub strength: f64,
}

impl Default for StylizedSurface {
    fn default() -> Self {
        Self {
            base: Rgb::new(0.1, 0.4, 0.8),
            highlight: Rgb::new(1.0, 1.0, 0.8),
            stripe_frequency: 5.0,
            strength: 0.3,
        }
    }
}

impl StylizedSurface {
    /// Color of a hit at `time`.
    pub fn shade(&self, hit: &SurfaceHit, time: f64) -> Rgb {
        let lit = self.base.scale(hit.light);
        let stripe = ((hit.point.x * self.stripe_frequency + time).sin() + 1.0) * 0.5;
        lit.mix(self.highlight, stripe * self.strength)
    }
}

/// Sky gradient behind raymarched scenes, darkening towards the top of the frame.
///
/// `uv` is the centered, aspect-corrected screen coordinate.
pub fn sky_background(uv: DVec2) -> Rgb {
    Rgb::new(0.5, 0.7, 1.0).scale(1.0 - uv.y * 0.5)
}

#[cfg(test)]
#[path = "../../tests/unit/raymarch/shade.rs"]
mod tests;
