use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::{BoundGraph, Domain, Graph, ParamSet, Value};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Signed distance field: negative inside, positive outside.
///
/// Implementations must not overestimate the distance to the nearest surface, or sphere tracing
/// can step through it.
pub trait Sdf: Sync {
    /// Signed distance from `p` to the surface.
    fn distance(&self, p: DVec3) -> f64;
}

impl<F> Sdf for F
where
    F: Fn(DVec3) -> f64 + Sync,
{
    fn distance(&self, p: DVec3) -> f64 {
        self(p)
    }
}

/// Distance field that changes over time.
///
/// Static fields ignore `time`. A frozen instant of any field is an [`Sdf`] through a closure:
/// `|p| field.distance_at(p, t)`.
pub trait AnimatedSdf: Sync {
    /// Signed distance from `p` at `time`.
    fn distance_at(&self, p: DVec3, time: f64) -> f64;
}

/// Sphere of `radius` around `center`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sphere {
    /// Center.
    pub center: DVec3,
    /// Radius.
    pub radius: f64,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            radius: 1.0,
        }
    }
}

impl Sdf for Sphere {
    fn distance(&self, p: DVec3) -> f64 {
        (p - self.center).length() - self.radius
    }
}

/// Infinite plane `dot(p, normal) = height`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plane {
    /// Unit normal.
    pub normal: DVec3,
    /// Offset along the normal.
    pub height: f64,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: DVec3::Y,
            height: 0.0,
        }
    }
}

impl Sdf for Plane {
    fn distance(&self, p: DVec3) -> f64 {
        p.dot(self.normal) - self.height
    }
}

impl AnimatedSdf for Sphere {
    fn distance_at(&self, p: DVec3, _time: f64) -> f64 {
        self.distance(p)
    }
}

impl AnimatedSdf for Plane {
    fn distance_at(&self, p: DVec3, _time: f64) -> f64 {
        self.distance(p)
    }
}

/// Horizontal plane displaced by travelling sine and cosine waves:
/// `y = A sin(x fx + t s) + A cos(z fz + t s)`.
///
/// The returned height difference is only a distance bound for gentle slopes, which the defaults
/// keep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavingPlane {
    /// Wave amplitude `A`.
    pub amplitude: f64,
    /// Spatial frequency along `x` and `z`.
    pub frequency: DVec2,
    /// Phase speed `s`.
    pub speed: f64,
    /// Time `t`.
    pub time: f64,
}

impl Default for WavingPlane {
    fn default() -> Self {
        Self {
            amplitude: 0.15,
            frequency: DVec2::new(3.0, 2.5),
            speed: 1.0,
            time: 0.0,
        }
    }
}

impl WavingPlane {
    /// Same waves at another time.
    pub fn at_time(self, time: f64) -> Self {
        Self { time, ..self }
    }

    /// Surface height above `(x, z)`.
    pub fn height(&self, x: f64, z: f64) -> f64 {
        let phase = self.time * self.speed;
        let wave_x = (x * self.frequency.x + phase).sin() * self.amplitude;
        let wave_z = (z * self.frequency.y + phase).cos() * self.amplitude;
        wave_x + wave_z
    }
}

impl Sdf for WavingPlane {
    fn distance(&self, p: DVec3) -> f64 {
        p.y - self.height(p.x, p.z)
    }
}

impl AnimatedSdf for WavingPlane {
    fn distance_at(&self, p: DVec3, time: f64) -> f64 {
        self.at_time(time).distance(p)
    }
}

thread_local! {
    static GRAPH_SCRATCH: RefCell<Vec<Value>> = const { RefCell::new(Vec::new()) };
}

/// Distance field defined by an expression graph over a volume domain.
///
/// The graph's primary output must be a scalar. [`Sdf::distance`] uses the time given at
/// construction; [`AnimatedSdf::distance_at`] reads the field at any other time.
#[derive(Clone, Debug)]
pub struct GraphSdf {
    bound: BoundGraph,
    time: f64,
}

impl GraphSdf {
    /// Bind `graph` for use as a distance field.
    pub fn new(graph: &Graph, params: &ParamSet, time: f64) -> ProcfieldResult<Self> {
        let (name, id) = graph.primary_output();
        let arity = graph.node(id).map_or(0, |n| n.arity());
        if arity != 1 {
            return Err(ProcfieldError::invalid_graph(format!(
                "distance output '{name}' must be scalar, got width {arity}"
            )));
        }
        let bound = graph.bind(Domain::Volume, params)?;
        Ok(Self { bound, time })
    }

    /// The bound graph.
    pub fn bound(&self) -> &BoundGraph {
        &self.bound
    }

    /// Time used by [`Sdf::distance`].
    pub fn time(&self) -> f64 {
        self.time
    }

}

impl AnimatedSdf for GraphSdf {
    fn distance_at(&self, p: DVec3, time: f64) -> f64 {
        GRAPH_SCRATCH.with(|scratch| {
            let mut scratch = scratch.borrow_mut();
            self.bound.eval_with_scratch(p, time, &mut scratch).x()
        })
    }
}

impl Sdf for GraphSdf {
    fn distance(&self, p: DVec3) -> f64 {
        self.distance_at(p, self.time)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raymarch/sdf.rs"]
mod tests;
