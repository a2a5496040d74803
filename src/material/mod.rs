//! Ready-made shading graphs with documented, serde-loadable defaults.
//!
//! A material turns a small config struct into a [`Graph`] plus the [`ParamSet`] it binds with.
//! Structural settings (octaves, scales) are baked into the graph; colors travel as parameters so
//! they can be rebound without rebuilding.
//!
//! Every material graph declares a `color` output (width 3) first. Materials with transparency also
//! declare a scalar `alpha` output.

use crate::foundation::error::ProcfieldResult;
use crate::graph::{BoundGraph, Domain, Graph, ParamSet};

/// Volumetric dissolve with a glowing edge.
pub mod dissolve;
/// Warped fractal noise between two colors.
pub mod fractal_noise;
/// Per-axis sine color bands.
pub mod sine_color;

pub use dissolve::DissolveMaterial;
pub use fractal_noise::FractalNoiseMaterial;
pub use sine_color::SineColorMaterial;

/// Name of the color output every material declares.
pub const COLOR_OUTPUT: &str = "color";
/// Name of the optional opacity output.
pub const ALPHA_OUTPUT: &str = "alpha";

/// A parameterized shading graph.
pub trait Material {
    /// Coordinate domain the graph is evaluated over.
    fn domain(&self) -> Domain;

    /// Build the graph. Fails when the configuration is invalid.
    fn build_graph(&self) -> ProcfieldResult<Graph>;

    /// Parameters to bind the graph with.
    fn params(&self) -> ParamSet;

    /// Build and bind in one step.
    fn bind(&self) -> ProcfieldResult<BoundGraph> {
        self.build_graph()?.bind(self.domain(), &self.params())
    }
}
