use crate::foundation::core::Rgb;
use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::{Domain, Graph, GraphBuilder, ParamSet};
use crate::material::{ALPHA_OUTPUT, COLOR_OUTPUT, Material};
use crate::noise::fractal::{FractalParams, fbm3};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Noise-driven dissolve over object-space positions.
///
/// With the fBm remapped to a signed range, `n = fbm(position * noise_scale) * 2 - 1`, and an
/// animated threshold `th = sin(time * animation_speed) + threshold_offset`:
///
/// - `alpha = smoothstep(th - glow_width, th, n)`
/// - `glow = alpha - smoothstep(th, th + glow_width, n)`
/// - `color = mix(base_color, glow_color, glow)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DissolveMaterial {
    /// Surface color away from the edge.
    pub base_color: Rgb,
    /// Edge color.
    pub glow_color: Rgb,
    /// Width of the glowing band in noise units.
    pub glow_width: f64,
    /// Position scale before sampling noise.
    pub noise_scale: f64,
    /// Threshold oscillation speed.
    pub animation_speed: f64,
    /// Threshold bias.
    pub threshold_offset: f64,
    /// Noise series.
    pub fractal: FractalParams,
}

impl Default for DissolveMaterial {
    fn default() -> Self {
        Self {
            base_color: Rgb::from_u32(0x0c0a09),
            glow_color: Rgb::from_u32(0x00ffff),
            glow_width: 0.025,
            noise_scale: 3.0,
            animation_speed: 0.1,
            threshold_offset: -0.27,
            fractal: FractalParams::default(),
        }
    }
}

impl DissolveMaterial {
    /// Signed noise in `[-1, 1]` at `p`, the value compared against the threshold.
    pub fn noise(&self, p: DVec3) -> f64 {
        fbm3(p * self.noise_scale, &self.fractal) * 2.0 - 1.0
    }

    /// Threshold at `time`.
    pub fn threshold(&self, time: f64) -> f64 {
        (time * self.animation_speed).sin() + self.threshold_offset
    }

    /// Reject a non-positive glow band and non-finite scales.
    pub fn validate(&self) -> ProcfieldResult<()> {
        if !(self.glow_width.is_finite() && self.glow_width > 0.0) {
            return Err(ProcfieldError::validation(
                "dissolve glow_width must be finite and > 0",
            ));
        }
        for (name, v) in [
            ("noise_scale", self.noise_scale),
            ("animation_speed", self.animation_speed),
            ("threshold_offset", self.threshold_offset),
        ] {
            if !v.is_finite() {
                return Err(ProcfieldError::validation(format!(
                    "dissolve {name} must be finite"
                )));
            }
        }
        self.fractal.validate()
    }
}

impl Material for DissolveMaterial {
    fn domain(&self) -> Domain {
        Domain::Volume
    }

    fn build_graph(&self) -> ProcfieldResult<Graph> {
        self.validate()?;
        let mut b = GraphBuilder::new();
        let position = b.position();
        let scale = b.scalar(self.noise_scale);
        let p = b.mul(position, scale)?;
        let unit = b.fbm(p, self.fractal.clone())?;
        let two = b.scalar(2.0);
        let one = b.scalar(1.0);
        let doubled = b.mul(unit, two)?;
        let n = b.sub(doubled, one)?;

        let time = b.time();
        let speed = b.scalar(self.animation_speed);
        let phase = b.mul(time, speed)?;
        let wave = b.sin(phase)?;
        let offset = b.scalar(self.threshold_offset);
        let th = b.add(wave, offset)?;

        let width = b.scalar(self.glow_width);
        let lo = b.sub(th, width)?;
        let hi = b.add(th, width)?;
        let up = b.smoothstep(lo, th, n)?;
        let down = b.smoothstep(th, hi, n)?;
        let glow = b.sub(up, down)?;

        let base = b.param("base_color", 3)?;
        let edge = b.param("glow_color", 3)?;
        let color = b.mix(base, edge, glow)?;
        b.output(COLOR_OUTPUT, color)?;
        b.output(ALPHA_OUTPUT, up)?;
        b.build()
    }

    fn params(&self) -> ParamSet {
        ParamSet::new()
            .with("base_color", self.base_color)
            .with("glow_color", self.glow_color)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/dissolve.rs"]
mod tests;
