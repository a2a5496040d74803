use crate::colormap::Colormap;
use crate::foundation::core::Rgb;
use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::{Domain, Graph, GraphBuilder, ParamSet};
use crate::material::{COLOR_OUTPUT, Material};
use crate::noise::fractal::{FractalParams, NoiseBasis, WarpParams};
use serde::{Deserialize, Serialize};

/// Animated, domain-warped fractal noise over texture coordinates.
///
/// `p = uv * uv_scale` is lifted to `(p.x, p.y, time * time_scale)` and fed through
/// [`crate::noise::fractal::warp3`]; the result blends `color_a` into `color_b`, or indexes
/// `colormap` when one is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalNoiseMaterial {
    /// Color at shade 0.
    pub color_a: Rgb,
    /// Color at shade 1.
    pub color_b: Rgb,
    /// Octave count.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub diminish: f64,
    /// Time multiplier for the third noise axis.
    pub time_scale: f64,
    /// Warp nesting depth (2 is the triple warp).
    pub warp_levels: u32,
    /// Texture coordinate scale.
    pub uv_scale: f64,
    /// Base noise.
    pub basis: NoiseBasis,
    /// Replaces the two-color blend when set.
    pub colormap: Option<Colormap>,
}

impl Default for FractalNoiseMaterial {
    fn default() -> Self {
        Self {
            color_a: Rgb::from_u32(0x4b5563),
            color_b: Rgb::from_u32(0x93c5fd),
            octaves: 8,
            lacunarity: 2.3,
            diminish: 0.45,
            time_scale: 0.03,
            warp_levels: 2,
            uv_scale: 4.0,
            basis: NoiseBasis::Simplex,
            colormap: None,
        }
    }
}

impl FractalNoiseMaterial {
    /// Octave series used by the warp.
    pub fn fractal(&self) -> FractalParams {
        FractalParams::new(self.octaves, self.lacunarity, self.diminish).with_basis(self.basis)
    }

    /// Warp configuration.
    pub fn warp(&self) -> WarpParams {
        WarpParams {
            levels: self.warp_levels,
            amplitude: 1.0,
        }
    }

    /// Check scales and the octave series.
    pub fn validate(&self) -> ProcfieldResult<()> {
        if !self.uv_scale.is_finite() || !self.time_scale.is_finite() {
            return Err(ProcfieldError::validation(
                "fractal noise uv_scale and time_scale must be finite",
            ));
        }
        self.fractal().validate()?;
        self.warp().validate()
    }
}

impl Material for FractalNoiseMaterial {
    fn domain(&self) -> Domain {
        Domain::Planar
    }

    fn build_graph(&self) -> ProcfieldResult<Graph> {
        self.validate()?;
        let mut b = GraphBuilder::new();
        let uv = b.uv();
        let uv_scale = b.scalar(self.uv_scale);
        let p = b.mul(uv, uv_scale)?;
        let time = b.time();
        let time_scale = b.scalar(self.time_scale);
        let z = b.mul(time, time_scale)?;
        let p3 = b.compose(&[p, z])?;
        let shade = b.warp(p3, self.fractal(), self.warp())?;

        let color = match &self.colormap {
            Some(map) => b.colormap(shade, map.clone())?,
            None => {
                let a = b.param("color_a", 3)?;
                let c = b.param("color_b", 3)?;
                b.mix(a, c, shade)?
            }
        };
        b.output(COLOR_OUTPUT, color)?;
        b.output("shade", shade)?;
        b.build()
    }

    fn params(&self) -> ParamSet {
        ParamSet::new()
            .with("color_a", self.color_a)
            .with("color_b", self.color_b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/fractal_noise.rs"]
mod tests;
