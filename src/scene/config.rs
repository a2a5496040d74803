use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::{Domain, GraphSpec, ParamSet};
use crate::material::{DissolveMaterial, FractalNoiseMaterial, SineColorMaterial};
use crate::raymarch::{GraphSdf, MarchConfig, Sphere, StylizedSurface, WavingPlane};
use crate::render::{FieldShader, LookAtCamera, RenderThreading};
use crate::scene::shaders::{GraphShader, RaymarchShader, SurfaceMaterialShader};

/// A renderable scene plus its output settings.
///
/// JSON shape:
///
/// ```json
/// {
///   "canvas": { "width": 320, "height": 180 },
///   "time": 1.5,
///   "fps": { "num": 30, "den": 1 },
///   "threading": { "parallel": true },
///   "scene": { "kind": "fractal_noise", "octaves": 6 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Output size.
    pub canvas: Canvas,
    /// Time of a single rendered frame, in seconds.
    pub time: f64,
    /// Frame rate for sequences.
    pub fps: Fps,
    /// Pixel evaluation threading.
    pub threading: RenderThreading,
    /// What to draw.
    pub scene: SceneKind,
}

/// Scene variants, tagged by `kind`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneKind {
    /// Warped fractal noise over the frame.
    FractalNoise(FractalNoiseMaterial),
    /// A dissolving sphere with a glowing edge.
    Dissolve(DissolveScene),
    /// A sphere colored by per-axis sine bands.
    SineColor(SineColorScene),
    /// Raymarched waving plane.
    WavingPlane(WavingPlaneScene),
    /// A user graph, drawn as a color field or raymarched as a distance field.
    Graph(GraphScene),
}

impl Default for SceneKind {
    fn default() -> Self {
        Self::FractalNoise(FractalNoiseMaterial::default())
    }
}

impl SceneKind {
    /// The `kind` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FractalNoise(_) => "fractal_noise",
            Self::Dissolve(_) => "dissolve",
            Self::SineColor(_) => "sine_color",
            Self::WavingPlane(_) => "waving_plane",
            Self::Graph(_) => "graph",
        }
    }
}

fn sphere_camera() -> LookAtCamera {
    LookAtCamera::new(DVec3::new(0.0, 0.0, -1.5), DVec3::ZERO)
}

fn small_sphere() -> Sphere {
    Sphere {
        center: DVec3::ZERO,
        radius: 0.4,
    }
}

/// Dissolve material on a sphere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DissolveScene {
    /// Surface material.
    pub material: DissolveMaterial,
    /// Geometry.
    pub sphere: Sphere,
    /// Viewpoint.
    pub camera: LookAtCamera,
    /// March limits.
    pub march: MarchConfig,
}

impl Default for DissolveScene {
    fn default() -> Self {
        Self {
            material: DissolveMaterial::default(),
            sphere: small_sphere(),
            camera: sphere_camera(),
            march: MarchConfig::default(),
        }
    }
}

/// Sine color material on a lit sphere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SineColorScene {
    /// Surface material.
    pub material: SineColorMaterial,
    /// Geometry.
    pub sphere: Sphere,
    /// Viewpoint.
    pub camera: LookAtCamera,
    /// March limits and lighting.
    pub march: MarchConfig,
}

impl Default for SineColorScene {
    fn default() -> Self {
        Self {
            material: SineColorMaterial::default(),
            sphere: small_sphere(),
            camera: sphere_camera(),
            march: MarchConfig::default(),
        }
    }
}

/// Waving plane seen from above.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavingPlaneScene {
    /// Geometry; its own `time` is replaced by the frame time.
    pub plane: WavingPlane,
    /// Viewpoint.
    pub camera: LookAtCamera,
    /// March limits and lighting.
    pub march: MarchConfig,
    /// Surface coloring.
    pub surface: StylizedSurface,
}

/// How a [`GraphScene`] is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphRender {
    /// Color per pixel from the `color` (or primary) output, optional `alpha`.
    #[default]
    Field,
    /// Primary output is a signed distance over `position`, raymarched and stylized.
    Sdf,
}

/// A graph document with bindings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphScene {
    /// Graph description.
    pub graph: GraphSpec,
    /// Parameter values.
    #[serde(default)]
    pub params: ParamSet,
    /// Drawing mode.
    #[serde(default)]
    pub render: GraphRender,
    /// Domain for `field` rendering. `sdf` always uses a volume domain.
    #[serde(default)]
    pub domain: Domain,
    /// Viewpoint for `sdf` rendering.
    #[serde(default)]
    pub camera: LookAtCamera,
    /// March limits for `sdf` rendering.
    #[serde(default)]
    pub march: MarchConfig,
    /// Surface coloring for `sdf` rendering.
    #[serde(default)]
    pub surface: StylizedSurface,
}

impl SceneConfig {
    /// Default settings around `scene`.
    pub fn new(scene: SceneKind) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> ProcfieldResult<Self> {
        serde_json::from_str(s).map_err(|e| ProcfieldError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ProcfieldResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ProcfieldError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ProcfieldResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ProcfieldError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> ProcfieldResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ProcfieldError::serde(format!("write scene JSON: {e}")))
    }

    /// Check output settings and scene parameters without building graphs.
    pub fn validate(&self) -> ProcfieldResult<()> {
        self.canvas.validate()?;
        if !self.time.is_finite() {
            return Err(ProcfieldError::validation("scene time must be finite"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.threading.threads == Some(0) {
            return Err(ProcfieldError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        match &self.scene {
            SceneKind::FractalNoise(m) => m.validate(),
            SceneKind::Dissolve(s) => {
                s.material.validate()?;
                validate_sphere(&s.sphere)?;
                s.camera.validate()?;
                s.march.validate()
            }
            SceneKind::SineColor(s) => {
                s.material.validate()?;
                validate_sphere(&s.sphere)?;
                s.camera.validate()?;
                s.march.validate()
            }
            SceneKind::WavingPlane(s) => {
                validate_waves(&s.plane)?;
                s.camera.validate()?;
                s.march.validate()
            }
            SceneKind::Graph(s) => {
                if s.render == GraphRender::Sdf {
                    s.camera.validate()?;
                    s.march.validate()?;
                }
                Ok(())
            }
        }
    }

    /// Validate, build graphs and bind them, producing a ready shader.
    ///
    /// Unbound or mistyped parameters are reported here, before any pixel is shaded.
    #[tracing::instrument(skip(self), fields(kind = self.scene.name()))]
    pub fn build(&self) -> ProcfieldResult<Box<dyn FieldShader>> {
        self.validate()?;
        let shader: Box<dyn FieldShader> = match &self.scene {
            SceneKind::FractalNoise(m) => Box::new(GraphShader::from_material(m)?),
            SceneKind::Dissolve(s) => Box::new(
                SurfaceMaterialShader::from_material(s.sphere, &s.material)?
                    .with_camera(s.camera)
                    .with_march(s.march.clone()),
            ),
            SceneKind::SineColor(s) => Box::new(
                SurfaceMaterialShader::from_material(s.sphere, &s.material)?
                    .with_camera(s.camera)
                    .with_march(s.march.clone())
                    .lit(true),
            ),
            SceneKind::WavingPlane(s) => Box::new(RaymarchShader {
                sdf: s.plane,
                camera: s.camera,
                march: s.march.clone(),
                surface: s.surface,
            }),
            SceneKind::Graph(s) => {
                let graph = s.graph.build()?;
                match s.render {
                    GraphRender::Field => Box::new(GraphShader::new(&graph, s.domain, &s.params)?),
                    GraphRender::Sdf => Box::new(RaymarchShader {
                        sdf: GraphSdf::new(&graph, &s.params, self.time)?,
                        camera: s.camera,
                        march: s.march.clone(),
                        surface: s.surface,
                    }),
                }
            }
        };
        tracing::debug!(
            width = self.canvas.width,
            height = self.canvas.height,
            "scene ready"
        );
        Ok(shader)
    }
}

fn validate_sphere(sphere: &Sphere) -> ProcfieldResult<()> {
    if !sphere.center.is_finite() || !(sphere.radius.is_finite() && sphere.radius > 0.0) {
        return Err(ProcfieldError::validation(
            "sphere center must be finite and radius finite and > 0",
        ));
    }
    Ok(())
}

fn validate_waves(plane: &WavingPlane) -> ProcfieldResult<()> {
    if !plane.amplitude.is_finite() || !plane.frequency.is_finite() || !plane.speed.is_finite() {
        return Err(ProcfieldError::validation(
            "waving plane amplitude, frequency and speed must be finite",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
