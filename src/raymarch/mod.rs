//! Sphere tracing through signed distance fields, with normal estimation and stylized shading.

/// The march loop and its results.
pub mod march;
/// Distance-field trait and primitives.
pub mod sdf;
/// Lighting, surface color and background.
pub mod shade;

pub use march::{
    MarchConfig, MarchOutcome, MarchState, Marcher, MissReason, Ray, SurfaceHit, estimate_normal,
    march, raymarch,
};
pub use sdf::{AnimatedSdf, GraphSdf, Plane, Sdf, Sphere, WavingPlane};
pub use shade::{Lighting, StylizedSurface, sky_background};
