use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::noise::simplex::simplex3_unit;
use crate::noise::value::{value_noise2, value_noise3};
use glam::{DMat2, DMat3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Upper bound on octaves accepted by [`FractalParams::validate`].
pub const MAX_OCTAVES: u32 = 32;

/// Base noise summed by [`fbm2`] and [`fbm3`]. Both variants sample in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseBasis {
    /// [`simplex3_unit`]; 2D coordinates are lifted to `z = 0`.
    #[default]
    Simplex,
    /// [`value_noise2`] / [`value_noise3`].
    Value,
}

impl NoiseBasis {
    #[inline]
    fn sample2(self, p: DVec2) -> f64 {
        match self {
            Self::Simplex => simplex3_unit(p.extend(0.0)),
            Self::Value => value_noise2(p),
        }
    }

    #[inline]
    fn sample3(self, p: DVec3) -> f64 {
        match self {
            Self::Simplex => simplex3_unit(p),
            Self::Value => value_noise3(p),
        }
    }
}

/// Octave series configuration.
///
/// Defaults: 3 octaves, lacunarity 2.0, gain 0.5, simplex basis, and a fixed rotation of roughly
/// 37° between octaves (the 3D matrix is orthonormal as well).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalParams {
    /// Number of summed octaves. Zero yields a constant 0.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave (a.k.a. diminish).
    pub gain: f64,
    /// Base noise.
    pub basis: NoiseBasis,
    /// Applied to 2D coordinates between octaves.
    pub rotation2: DMat2,
    /// Applied to 3D coordinates between octaves.
    pub rotation3: DMat3,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 3,
            lacunarity: 2.0,
            gain: 0.5,
            basis: NoiseBasis::Simplex,
            rotation2: DMat2::from_cols_array(&[0.8, 0.6, -0.6, 0.8]),
            rotation3: DMat3::from_cols_array(&[
                0.00, 0.80, 0.60, //
                -0.80, 0.36, -0.48, //
                -0.60, -0.48, 0.64,
            ]),
        }
    }
}

impl FractalParams {
    /// Default rotation and basis with the given series shape.
    pub fn new(octaves: u32, lacunarity: f64, gain: f64) -> Self {
        Self {
            octaves,
            lacunarity,
            gain,
            ..Self::default()
        }
    }

    /// Replace the base noise.
    pub fn with_basis(mut self, basis: NoiseBasis) -> Self {
        self.basis = basis;
        self
    }

    /// Disable the inter-octave rotation.
    pub fn without_rotation(mut self) -> Self {
        self.rotation2 = DMat2::IDENTITY;
        self.rotation3 = DMat3::IDENTITY;
        self
    }

    /// Reject parameter sets that cannot produce a bounded series.
    pub fn validate(&self) -> ProcfieldResult<()> {
        if self.octaves > MAX_OCTAVES {
            return Err(ProcfieldError::validation(format!(
                "fractal octaves must be <= {MAX_OCTAVES}, got {}",
                self.octaves
            )));
        }
        if !self.lacunarity.is_finite() || self.lacunarity <= 0.0 {
            return Err(ProcfieldError::validation(
                "fractal lacunarity must be finite and > 0",
            ));
        }
        if !self.gain.is_finite() || self.gain < 0.0 {
            return Err(ProcfieldError::validation(
                "fractal gain must be finite and >= 0",
            ));
        }
        if !self.rotation2.is_finite() || !self.rotation3.is_finite() {
            return Err(ProcfieldError::validation(
                "fractal rotation matrices must be finite",
            ));
        }
        Ok(())
    }

    /// Sum of all octave amplitudes.
    pub fn total_amplitude(&self) -> f64 {
        let mut amp = 1.0;
        let mut total = 0.0;
        for _ in 0..self.octaves {
            total += amp;
            amp *= self.gain;
        }
        total
    }
}

/// Fractal Brownian motion over a 2D coordinate, normalized to the basis range.
///
/// Octave `k` adds `gain^k * noise(R^k p * lacunarity^k)`; the sum is divided by the total
/// amplitude, so adding octave `k` moves the result by at most `gain^k`.
pub fn fbm2(p: DVec2, params: &FractalParams) -> f64 {
    let mut acc = 0.0;
    let mut norm = 0.0;
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut q = p;
    for _ in 0..params.octaves {
        acc += amp * params.basis.sample2(q * freq);
        norm += amp;
        freq *= params.lacunarity;
        amp *= params.gain;
        q = params.rotation2 * q;
    }
    if norm > 0.0 { acc / norm } else { 0.0 }
}

/// 3D counterpart of [`fbm2`].
pub fn fbm3(p: DVec3, params: &FractalParams) -> f64 {
    let mut acc = 0.0;
    let mut norm = 0.0;
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut q = p;
    for _ in 0..params.octaves {
        acc += amp * params.basis.sample3(q * freq);
        norm += amp;
        freq *= params.lacunarity;
        amp *= params.gain;
        q = params.rotation3 * q;
    }
    if norm > 0.0 { acc / norm } else { 0.0 }
}

/// Self-referential warping configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpParams {
    /// Nesting depth. `0` is plain fBm, `2` is the classic triple warp
    /// `fbm(p + fbm(p + fbm(p)))`.
    pub levels: u32,
    /// Scale of each displacement.
    pub amplitude: f64,
}

impl Default for WarpParams {
    fn default() -> Self {
        Self {
            levels: 2,
            amplitude: 1.0,
        }
    }
}

impl WarpParams {
    /// Reject non-finite amplitudes and absurd nesting depths.
    pub fn validate(&self) -> ProcfieldResult<()> {
        if self.levels > MAX_OCTAVES {
            return Err(ProcfieldError::validation(format!(
                "warp levels must be <= {MAX_OCTAVES}, got {}",
                self.levels
            )));
        }
        if !self.amplitude.is_finite() {
            return Err(ProcfieldError::validation("warp amplitude must be finite"));
        }
        Ok(())
    }
}

/// Domain-warped fBm over a 2D coordinate.
///
/// Each level feeds the previous fBm value back as a displacement added to every axis.
pub fn warp2(p: DVec2, fractal: &FractalParams, warp: &WarpParams) -> f64 {
    let mut shift = 0.0;
    for _ in 0..warp.levels {
        shift = warp.amplitude * fbm2(p + DVec2::splat(shift), fractal);
    }
    fbm2(p + DVec2::splat(shift), fractal)
}

/// Domain-warped fBm over a 3D coordinate.
pub fn warp3(p: DVec3, fractal: &FractalParams, warp: &WarpParams) -> f64 {
    let mut shift = 0.0;
    for _ in 0..warp.levels {
        shift = warp.amplitude * fbm3(p + DVec3::splat(shift), fractal);
    }
    fbm3(p + DVec3::splat(shift), fractal)
}

#[cfg(test)]
#[path = "../../tests/unit/noise/fractal.rs"]
mod tests;
