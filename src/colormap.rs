//! Piecewise-linear scalar to color transfer functions.

use crate::foundation::core::Rgb;
use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use serde::{Deserialize, Serialize};

/// One affine segment of a channel: applies to inputs below `threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Exclusive upper bound of the segment.
    pub threshold: f64,
    /// Multiplier on the input.
    pub slope: f64,
    /// Constant term.
    pub intercept: f64,
}

impl Breakpoint {
    /// Segment with explicit affine terms.
    pub const fn new(threshold: f64, slope: f64, intercept: f64) -> Self {
        Self {
            threshold,
            slope,
            intercept,
        }
    }

    /// Constant segment.
    pub const fn flat(threshold: f64, value: f64) -> Self {
        Self::new(threshold, 0.0, value)
    }

    /// Segment rising from 0 at `start` to 1 at `threshold`.
    pub fn ramp(start: f64, threshold: f64) -> Self {
        let slope = 1.0 / (threshold - start);
        Self::new(threshold, slope, -start * slope)
    }

    #[inline]
    fn apply(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Per-channel transfer function.
///
/// For an input `x` (clamped to `[0, 1]`), each channel picks the first breakpoint whose threshold
/// exceeds `x`, falling back to its last breakpoint, and clamps the affine result to `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColormapDef")]
pub struct Colormap {
    red: Vec<Breakpoint>,
    green: Vec<Breakpoint>,
    blue: Vec<Breakpoint>,
}

#[derive(Deserialize)]
struct ColormapDef {
    red: Vec<Breakpoint>,
    green: Vec<Breakpoint>,
    blue: Vec<Breakpoint>,
}

impl TryFrom<ColormapDef> for Colormap {
    type Error = ProcfieldError;

    fn try_from(def: ColormapDef) -> Result<Self, Self::Error> {
        Self::new(def.red, def.green, def.blue)
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::hot()
    }
}

impl Colormap {
    /// Build and validate a colormap.
    pub fn new(
        red: Vec<Breakpoint>,
        green: Vec<Breakpoint>,
        blue: Vec<Breakpoint>,
    ) -> ProcfieldResult<Self> {
        for (name, channel) in [("red", &red), ("green", &green), ("blue", &blue)] {
            validate_channel(name, channel)?;
        }
        Ok(Self { red, green, blue })
    }

    /// Black through red, orange and yellow to white.
    pub fn hot() -> Self {
        Self {
            red: vec![Breakpoint::ramp(0.0, 0.365), Breakpoint::flat(1.0, 1.0)],
            green: vec![
                Breakpoint::flat(0.365, 0.0),
                Breakpoint::ramp(0.365, 0.746),
                Breakpoint::flat(1.0, 1.0),
            ],
            blue: vec![Breakpoint::flat(0.746, 0.0), Breakpoint::ramp(0.746, 1.0)],
        }
    }

    /// Linear ramp between two colors.
    pub fn gradient(from: Rgb, to: Rgb) -> Self {
        let channel = |a: f64, b: f64| vec![Breakpoint::new(1.0, b - a, a)];
        Self {
            red: channel(from.r, to.r),
            green: channel(from.g, to.g),
            blue: channel(from.b, to.b),
        }
    }

    /// Red channel breakpoints.
    pub fn red(&self) -> &[Breakpoint] {
        &self.red
    }

    /// Green channel breakpoints.
    pub fn green(&self) -> &[Breakpoint] {
        &self.green
    }

    /// Blue channel breakpoints.
    pub fn blue(&self) -> &[Breakpoint] {
        &self.blue
    }

    /// Map `x` to a color. NaN yields NaN channels.
    pub fn eval(&self, x: f64) -> Rgb {
        let x = x.clamp(0.0, 1.0);
        Rgb::new(
            eval_channel(&self.red, x),
            eval_channel(&self.green, x),
            eval_channel(&self.blue, x),
        )
    }
}

fn eval_channel(channel: &[Breakpoint], x: f64) -> f64 {
    let segment = channel
        .iter()
        .find(|b| b.threshold > x)
        .or_else(|| channel.last());
    match segment {
        Some(b) => b.apply(x).clamp(0.0, 1.0),
        None => f64::NAN,
    }
}

fn validate_channel(name: &str, channel: &[Breakpoint]) -> ProcfieldResult<()> {
    if channel.is_empty() {
        return Err(ProcfieldError::validation(format!(
            "colormap channel '{name}' needs at least one breakpoint"
        )));
    }
    for b in channel {
        if !(b.threshold.is_finite() && b.slope.is_finite() && b.intercept.is_finite()) {
            return Err(ProcfieldError::validation(format!(
                "colormap channel '{name}' has a non-finite breakpoint"
            )));
        }
    }
    if channel.windows(2).any(|w| w[0].threshold >= w[1].threshold) {
        return Err(ProcfieldError::validation(format!(
            "colormap channel '{name}' thresholds must be strictly ascending"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/colormap.rs"]
mod tests;
