//! Pixel-to-sample pipeline: camera rays, per-pixel shaders, frames and frame sinks.
//!
//! Rendering only drives the evaluators; it never changes what a graph or distance field computes.

/// Look-at pinhole camera.
pub mod camera;
/// Samples, pixel coordinates, the shader trait and RGBA8 frames.
pub mod frame;
/// Sequential and parallel rendering of frames and sequences.
pub mod pipeline;
/// Frame consumers.
pub mod sink;

pub use camera::{CameraBasis, LookAtCamera};
pub use frame::{FieldShader, FrameRGBA, PixelSample, Sample};
pub use pipeline::{
    CancelFlag, RenderStats, RenderThreading, SequenceOpts, render_frame, render_samples,
    render_sequence,
};
pub use sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
