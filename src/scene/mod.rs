//! Ready-to-render scenes: shaders that connect materials, graphs and distance fields to the
//! render pipeline, and the JSON configuration that selects one.

/// Scene configuration and shader construction.
pub mod config;
/// Field shaders over graphs and raymarched surfaces.
pub mod shaders;

pub use config::{
    DissolveScene, GraphRender, GraphScene, SceneConfig, SceneKind, SineColorScene,
    WavingPlaneScene,
};
pub use shaders::{GraphShader, RaymarchShader, SurfaceMaterialShader};
