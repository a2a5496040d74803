use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::{Domain, Graph, GraphBuilder, ParamSet};
use crate::material::{COLOR_OUTPUT, Material};
use serde::{Deserialize, Serialize};

/// `color = (sin(position * frequency + time) + 1) / 2`, per axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SineColorMaterial {
    /// Spatial frequency.
    pub frequency: f64,
}

impl Default for SineColorMaterial {
    fn default() -> Self {
        Self { frequency: 2.0 }
    }
}

impl SineColorMaterial {
    /// Reject a non-finite frequency.
    pub fn validate(&self) -> ProcfieldResult<()> {
        if !self.frequency.is_finite() {
            return Err(ProcfieldError::validation(
                "sine color frequency must be finite",
            ));
        }
        Ok(())
    }
}

impl Material for SineColorMaterial {
    fn domain(&self) -> Domain {
        Domain::Volume
    }

    fn build_graph(&self) -> ProcfieldResult<Graph> {
        self.validate()?;
        let mut b = GraphBuilder::new();
        let position = b.position();
        let freq = b.scalar(self.frequency);
        let scaled = b.mul(position, freq)?;
        let time = b.time();
        let phase = b.add(scaled, time)?;
        let wave = b.sin(phase)?;
        let one = b.scalar(1.0);
        let half = b.scalar(0.5);
        let lifted = b.add(wave, one)?;
        let color = b.mul(lifted, half)?;
        b.output(COLOR_OUTPUT, color)?;
        b.build()
    }

    fn params(&self) -> ParamSet {
        ParamSet::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/sine_color.rs"]
mod tests;
