use glam::{DVec2, DVec3};

use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::{BoundGraph, Domain, Graph, NodeId, ParamSet, Value};
use crate::material::{ALPHA_OUTPUT, COLOR_OUTPUT, Material};
use crate::raymarch::{
    AnimatedSdf, MarchConfig, StylizedSurface, SurfaceHit, raymarch, sky_background,
};
use crate::render::{FieldShader, LookAtCamera, PixelSample, Sample};

/// Color and optional alpha nodes of a shading graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ShadingOutputs {
    color: NodeId,
    alpha: Option<NodeId>,
}

impl ShadingOutputs {
    /// `color` falls back to the primary output. It may be a scalar (gray) or have 3 or 4 lanes
    /// (the fourth is ignored). `alpha` must be a scalar.
    fn resolve(graph: &Graph) -> ProcfieldResult<Self> {
        let color = graph
            .output(COLOR_OUTPUT)
            .unwrap_or_else(|| graph.primary_output().1);
        let width = graph.node(color).map_or(0, |n| n.arity());
        if !matches!(width, 1 | 3 | 4) {
            return Err(ProcfieldError::invalid_graph(format!(
                "color output must have width 1, 3 or 4, got {width}"
            )));
        }
        let alpha = graph.output(ALPHA_OUTPUT);
        if let Some(id) = alpha {
            let width = graph.node(id).map_or(0, |n| n.arity());
            if width != 1 {
                return Err(ProcfieldError::invalid_graph(format!(
                    "'{ALPHA_OUTPUT}' output must be scalar, got width {width}"
                )));
            }
        }
        Ok(Self { color, alpha })
    }

    fn read(self, scratch: &[Value]) -> Sample {
        let value = |id: NodeId| scratch.get(id.index()).copied().unwrap_or_default();
        let color = value(self.color).to_rgb();
        let alpha = self.alpha.map_or(1.0, |id| value(id).x());
        Sample::new(color, alpha)
    }
}

/// Flat color field: each pixel evaluates a graph at `(u, v)`.
///
/// In a volume domain `position` reads `(u, v, 0)`.
#[derive(Clone, Debug)]
pub struct GraphShader {
    bound: BoundGraph,
    outputs: ShadingOutputs,
}

impl GraphShader {
    /// Bind `graph` over `domain`.
    pub fn new(graph: &Graph, domain: Domain, params: &ParamSet) -> ProcfieldResult<Self> {
        let outputs = ShadingOutputs::resolve(graph)?;
        let bound = graph.bind(domain, params)?;
        Ok(Self { bound, outputs })
    }

    /// Build and bind a material.
    pub fn from_material<M: Material + ?Sized>(material: &M) -> ProcfieldResult<Self> {
        Self::new(&material.build_graph()?, material.domain(), &material.params())
    }

    /// The bound graph.
    pub fn bound(&self) -> &BoundGraph {
        &self.bound
    }
}

impl FieldShader for GraphShader {
    fn shade(&self, pixel: &PixelSample, scratch: &mut Vec<Value>) -> Sample {
        let coord = DVec3::new(pixel.uv.x, pixel.uv.y, 0.0);
        self.bound.run(coord, pixel.time, scratch);
        self.outputs.read(scratch)
    }
}

/// Sphere-traced surface with stylized lighting over the sky gradient.
#[derive(Clone, Debug)]
pub struct RaymarchShader<S> {
    /// Scene geometry.
    pub sdf: S,
    /// Viewpoint.
    pub camera: LookAtCamera,
    /// March limits and lighting.
    pub march: MarchConfig,
    /// Surface coloring.
    pub surface: StylizedSurface,
}

impl<S: AnimatedSdf> RaymarchShader<S> {
    /// Default camera, march settings and surface.
    pub fn new(sdf: S) -> Self {
        Self {
            sdf,
            camera: LookAtCamera::default(),
            march: MarchConfig::default(),
            surface: StylizedSurface::default(),
        }
    }

    /// Trace the primary ray through a centered screen coordinate.
    pub fn trace(&self, screen: DVec2, time: f64) -> Option<SurfaceHit> {
        trace(&self.sdf, &self.camera, &self.march, screen, time)
    }
}

impl<S: AnimatedSdf> FieldShader for RaymarchShader<S> {
    fn shade(&self, pixel: &PixelSample, _scratch: &mut Vec<Value>) -> Sample {
        match self.trace(pixel.screen, pixel.time) {
            Some(hit) => Sample::opaque(self.surface.shade(&hit, pixel.time)),
            None => Sample::opaque(sky_background(pixel.screen)),
        }
    }
}

/// Sphere-traced surface colored by a material evaluated at the hit point.
///
/// The material's alpha blends the surface over the sky. With `lit` set, the color is scaled by
/// the light intensity at the hit.
#[derive(Clone, Debug)]
pub struct SurfaceMaterialShader<S> {
    sdf: S,
    camera: LookAtCamera,
    march: MarchConfig,
    bound: BoundGraph,
    outputs: ShadingOutputs,
    lit: bool,
}

impl<S: AnimatedSdf> SurfaceMaterialShader<S> {
    /// Bind `graph` over `domain` and attach it to `sdf`. A planar graph reads the hit's `(x, y)`.
    pub fn new(
        sdf: S,
        graph: &Graph,
        domain: Domain,
        params: &ParamSet,
    ) -> ProcfieldResult<Self> {
        let outputs = ShadingOutputs::resolve(graph)?;
        let bound = graph.bind(domain, params)?;
        Ok(Self {
            sdf,
            camera: LookAtCamera::default(),
            march: MarchConfig::default(),
            bound,
            outputs,
            lit: false,
        })
    }

    /// Build and bind a material.
    pub fn from_material<M: Material + ?Sized>(sdf: S, material: &M) -> ProcfieldResult<Self> {
        Self::new(
            sdf,
            &material.build_graph()?,
            material.domain(),
            &material.params(),
        )
    }

    /// Replace the camera.
    pub fn with_camera(mut self, camera: LookAtCamera) -> Self {
        self.camera = camera;
        self
    }

    /// Replace the march settings.
    pub fn with_march(mut self, march: MarchConfig) -> Self {
        self.march = march;
        self
    }

    /// Scale the material color by the light intensity.
    pub fn lit(mut self, lit: bool) -> Self {
        self.lit = lit;
        self
    }
}

impl<S: AnimatedSdf> FieldShader for SurfaceMaterialShader<S> {
    fn shade(&self, pixel: &PixelSample, scratch: &mut Vec<Value>) -> Sample {
        let sky = sky_background(pixel.screen);
        let Some(hit) = trace(&self.sdf, &self.camera, &self.march, pixel.screen, pixel.time)
        else {
            return Sample::opaque(sky);
        };
        self.bound.run(hit.point, pixel.time, scratch);
        let mut surface = self.outputs.read(scratch);
        if self.lit {
            surface.color = surface.color.scale(hit.light);
        }
        surface.over(sky)
    }
}

fn trace<S: AnimatedSdf + ?Sized>(
    sdf: &S,
    camera: &LookAtCamera,
    march: &MarchConfig,
    screen: DVec2,
    time: f64,
) -> Option<SurfaceHit> {
    let field = |p: DVec3| sdf.distance_at(p, time);
    raymarch(&camera.ray(screen), &field, march)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shaders.rs"]
mod tests;
