//! procfield evaluates procedural visual signals as pure functions of space and time.
//!
//! The crate is layered:
//!
//! - [`graph`]: immutable expression graphs over scalars and small vectors, built in code with
//!   [`GraphBuilder`] or from JSON with [`build_graph`], bound once with [`Graph::bind`] and then
//!   evaluated per sample without failure
//! - [`noise`] and [`colormap`]: hashes, value and simplex noise, fBm with domain warping, and a
//!   piecewise-linear transfer function
//! - [`raymarch`]: sphere tracing through signed distance fields with normal estimation and
//!   stylized shading
//! - [`material`], [`render`] and [`scene`]: ready-made shading graphs, the pixel pipeline that
//!   drives them, and the JSON scene description used by the `procfield` binary
//!
//! Structural problems (cycles, width mismatches, unbound inputs) surface as
//! [`ProcfieldError`] before any sample is evaluated. Numeric edge cases inside a sample
//! propagate as NaN instead.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Piecewise-linear colormaps.
pub mod colormap;
/// Expression graphs: construction, binding and evaluation.
pub mod graph;
/// Shading graphs built from config structs.
pub mod material;
/// Procedural noise primitives.
pub mod noise;
/// Sphere tracing.
pub mod raymarch;
/// Pixel pipeline and frame sinks.
pub mod render;
/// Scene configuration and shaders.
pub mod scene;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgb};
pub use crate::foundation::error::{ProcfieldError, ProcfieldResult};
pub use crate::foundation::math::{fract, mix, smoothstep, step};

pub use crate::colormap::{Breakpoint, Colormap};
pub use crate::graph::{
    BoundGraph, Domain, EvalContext, Graph, GraphBuilder, GraphSpec, ParamSet, Value,
    build_graph, evaluate,
};
pub use crate::material::{
    DissolveMaterial, FractalNoiseMaterial, Material, SineColorMaterial,
};
pub use crate::noise::fractal::{
    FractalParams, NoiseBasis, WarpParams, fbm2, fbm3, warp2, warp3,
};
pub use crate::noise::hash::{hash_dir3, hash12, hash13};
pub use crate::noise::simplex::{simplex3, simplex3_unit};
pub use crate::noise::value::{value_noise2, value_noise3};
pub use crate::raymarch::{
    AnimatedSdf, GraphSdf, MarchConfig, MarchOutcome, Ray, Sdf, SurfaceHit, march, raymarch,
};
pub use crate::render::{
    CancelFlag, FieldShader, FrameRGBA, FrameSink, InMemorySink, LookAtCamera, PngSequenceSink,
    RenderStats, RenderThreading, Sample, SequenceOpts, SinkConfig, render_frame,
    render_samples, render_sequence,
};
pub use crate::scene::{SceneConfig, SceneKind};
