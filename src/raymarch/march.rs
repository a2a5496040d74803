use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::raymarch::sdf::Sdf;
use crate::raymarch::shade::Lighting;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A ray with a unit-length direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: DVec3,
    /// Unit direction.
    pub direction: DVec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero direction stays zero and never advances.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Sphere-tracing limits and hit shading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchConfig {
    /// Step budget, `> 0`.
    pub max_steps: u32,
    /// Travel limit, `> 0`.
    pub max_distance: f64,
    /// A sample closer than this counts as a hit, `> 0`.
    pub surface_epsilon: f64,
    /// Central-difference offset for normals, `> 0`.
    pub normal_offset: f64,
    /// Light applied to hits.
    pub lighting: Lighting,
}

impl Default for MarchConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            max_distance: 100.0,
            surface_epsilon: 0.001,
            normal_offset: 0.001,
            lighting: Lighting::default(),
        }
    }
}

impl MarchConfig {
    /// Reject non-positive limits.
    pub fn validate(&self) -> ProcfieldResult<()> {
        if self.max_steps == 0 {
            return Err(ProcfieldError::validation("march max_steps must be > 0"));
        }
        for (name, v) in [
            ("max_distance", self.max_distance),
            ("surface_epsilon", self.surface_epsilon),
            ("normal_offset", self.normal_offset),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(ProcfieldError::validation(format!(
                    "march {name} must be finite and > 0"
                )));
            }
        }
        self.lighting.validate()
    }
}

/// Where a march is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarchState {
    /// Still stepping.
    Marching,
    /// Terminated on a surface.
    Hit,
    /// Terminated without a surface.
    Miss,
}

/// Why a march ended without a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissReason {
    /// Travelled past `max_distance`.
    Escaped,
    /// Used every step without converging.
    StepBudget,
    /// The distance field returned NaN.
    NonFinite,
}

/// A shaded surface intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceHit {
    /// Sample point within `surface_epsilon` of the surface.
    pub point: DVec3,
    /// Unit normal estimate (zero when the gradient vanishes).
    pub normal: DVec3,
    /// Distance travelled from the ray origin.
    pub distance: f64,
    /// Steps taken before the hit (0 when the origin is already on the surface).
    pub steps: u32,
    /// Diffuse plus ambient intensity at the hit.
    pub light: f64,
}

/// Full result of a march, including misses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarchOutcome {
    /// Surface found.
    Hit(SurfaceHit),
    /// No surface.
    Miss {
        /// Why the march stopped.
        reason: MissReason,
        /// Steps taken.
        steps: u32,
        /// Distance travelled.
        distance: f64,
    },
}

impl MarchOutcome {
    /// Terminal state.
    pub fn state(&self) -> MarchState {
        match self {
            Self::Hit(_) => MarchState::Hit,
            Self::Miss { .. } => MarchState::Miss,
        }
    }

    /// The hit, if any.
    pub fn hit(self) -> Option<SurfaceHit> {
        match self {
            Self::Hit(h) => Some(h),
            Self::Miss { .. } => None,
        }
    }
}

/// Single-ray sphere tracer exposing the `Marching -> Hit | Miss` state machine step by step.
pub struct Marcher<'a, S: Sdf + ?Sized> {
    ray: Ray,
    sdf: &'a S,
    config: &'a MarchConfig,
    point: DVec3,
    traveled: f64,
    steps: u32,
    outcome: Option<MarchOutcome>,
}

impl<'a, S: Sdf + ?Sized> Marcher<'a, S> {
    /// Start at the ray origin.
    pub fn new(ray: &Ray, sdf: &'a S, config: &'a MarchConfig) -> Self {
        Self {
            ray: *ray,
            sdf,
            config,
            point: ray.origin,
            traveled: 0.0,
            steps: 0,
            outcome: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> MarchState {
        self.outcome
            .map_or(MarchState::Marching, |outcome| outcome.state())
    }

    /// Current sample point.
    pub fn point(&self) -> DVec3 {
        self.point
    }

    /// Distance travelled so far.
    pub fn traveled(&self) -> f64 {
        self.traveled
    }

    /// Advance one transition. Returns the outcome once terminal.
    pub fn step(&mut self) -> Option<MarchOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        if self.steps >= self.config.max_steps {
            return self.finish_miss(MissReason::StepBudget);
        }

        if self.traveled > self.config.max_distance {
            return self.finish_miss(MissReason::Escaped);
        }

        let d = self.sdf.distance(self.point);
        if d.is_nan() {
            return self.finish_miss(MissReason::NonFinite);
        }
        if d < self.config.surface_epsilon {
            let normal = estimate_normal(self.sdf, self.point, self.config.normal_offset);
            let hit = SurfaceHit {
                point: self.point,
                normal,
                distance: self.traveled,
                steps: self.steps,
                light: self.config.lighting.intensity(normal),
            };
            self.outcome = Some(MarchOutcome::Hit(hit));
            return self.outcome;
        }
        self.traveled += d;
        self.point += self.ray.direction * d;
        self.steps += 1;
        None
    }

    /// Step until terminal.
    pub fn run(mut self) -> MarchOutcome {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    fn finish_miss(&mut self, reason: MissReason) -> Option<MarchOutcome> {
        self.outcome = Some(MarchOutcome::Miss {
            reason,
            steps: self.steps,
            distance: self.traveled,
        });
        self.outcome
    }
}

/// Sphere-trace `ray` through `sdf`, reporting hits and misses alike.
///
/// Each step first ends the march as a miss once travel exceeds `max_distance`, then samples
/// `d = sdf(p)`: `d < surface_epsilon` is a hit, otherwise the point advances by exactly `d`.
/// Running out of steps is a miss too. A reported hit never lies beyond `max_distance`.
pub fn march<S: Sdf + ?Sized>(ray: &Ray, sdf: &S, config: &MarchConfig) -> MarchOutcome {
    Marcher::new(ray, sdf, config).run()
}

/// Sphere-trace `ray` through `sdf`; `None` means the caller should fall back to a background.
pub fn raymarch<S: Sdf + ?Sized>(ray: &Ray, sdf: &S, config: &MarchConfig) -> Option<SurfaceHit> {
    march(ray, sdf, config).hit()
}

/// Normalized central-difference gradient of `sdf` at `p` with offset `h`.
pub fn estimate_normal<S: Sdf + ?Sized>(sdf: &S, p: DVec3, h: f64) -> DVec3 {
    let dx = DVec3::new(h, 0.0, 0.0);
    let dy = DVec3::new(0.0, h, 0.0);
    let dz = DVec3::new(0.0, 0.0, h);
    DVec3::new(
        sdf.distance(p + dx) - sdf.distance(p - dx),
        sdf.distance(p + dy) - sdf.distance(p - dy),
        sdf.distance(p + dz) - sdf.distance(p - dz),
    )
    .normalize_or_zero()
}

#[cfg(test)]
#[path = "../../tests/unit/raymarch/march.rs"]
mod tests;
