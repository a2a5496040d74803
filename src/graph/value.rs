use crate::foundation::core::Rgb;
use glam::{DVec2, DVec3, DVec4};
use serde::{Deserialize, Serialize};

/// Widest vector a node can produce.
pub const MAX_ARITY: usize = 4;

/// Result of evaluating one node: a scalar or a 2/3/4-wide vector of `f64`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Arity 1.
    Scalar(f64),
    /// Arity 2.
    Vec2(DVec2),
    /// Arity 3.
    Vec3(DVec3),
    /// Arity 4.
    Vec4(DVec4),
}

impl Default for Value {
    fn default() -> Self {
        Self::Scalar(0.0)
    }
}

impl Value {
    /// Number of lanes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vec2(_) => 2,
            Self::Vec3(_) => 3,
            Self::Vec4(_) => 4,
        }
    }

    /// Lanes padded with zeros to [`MAX_ARITY`].
    pub fn lanes(&self) -> [f64; MAX_ARITY] {
        match *self {
            Self::Scalar(x) => [x, 0.0, 0.0, 0.0],
            Self::Vec2(v) => [v.x, v.y, 0.0, 0.0],
            Self::Vec3(v) => [v.x, v.y, v.z, 0.0],
            Self::Vec4(v) => v.to_array(),
        }
    }

    /// Lane `i` under the broadcast rule: a scalar answers every lane.
    #[inline]
    pub fn lane(&self, i: usize) -> f64 {
        match *self {
            Self::Scalar(x) => x,
            _ => self.lanes()[i],
        }
    }

    /// Rebuild a value from the first `arity` lanes. Arity is clamped to `1..=4`.
    pub fn from_lanes(lanes: [f64; MAX_ARITY], arity: usize) -> Self {
        match arity {
            0 | 1 => Self::Scalar(lanes[0]),
            2 => Self::Vec2(DVec2::new(lanes[0], lanes[1])),
            3 => Self::Vec3(DVec3::new(lanes[0], lanes[1], lanes[2])),
            _ => Self::Vec4(DVec4::from_array(lanes)),
        }
    }

    /// Element-wise map.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = self.lanes();
        for lane in out.iter_mut().take(self.arity()) {
            *lane = f(*lane);
        }
        Self::from_lanes(out, self.arity())
    }

    /// Element-wise combine with broadcast. Callers guarantee compatible arities.
    pub fn zip(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let arity = self.arity().max(other.arity());
        let mut out = [0.0; MAX_ARITY];
        for (i, lane) in out.iter_mut().enumerate().take(arity) {
            *lane = f(self.lane(i), other.lane(i));
        }
        Self::from_lanes(out, arity)
    }

    /// Three-way element-wise combine with broadcast.
    pub fn zip3(a: Self, b: Self, c: Self, f: impl Fn(f64, f64, f64) -> f64) -> Self {
        let arity = a.arity().max(b.arity()).max(c.arity());
        let mut out = [0.0; MAX_ARITY];
        for (i, lane) in out.iter_mut().enumerate().take(arity) {
            *lane = f(a.lane(i), b.lane(i), c.lane(i));
        }
        Self::from_lanes(out, arity)
    }

    /// The scalar, or the first lane of a vector.
    pub fn x(&self) -> f64 {
        self.lanes()[0]
    }

    /// Scalar payload, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Self::Scalar(x) => Some(x),
            _ => None,
        }
    }

    /// First two lanes (a scalar is splatted).
    pub fn to_dvec2(&self) -> DVec2 {
        match *self {
            Self::Scalar(x) => DVec2::splat(x),
            Self::Vec2(v) => v,
            Self::Vec3(v) => v.truncate(),
            Self::Vec4(v) => v.truncate().truncate(),
        }
    }

    /// First three lanes (a scalar is splatted, missing lanes read 0).
    pub fn to_dvec3(&self) -> DVec3 {
        match *self {
            Self::Scalar(x) => DVec3::splat(x),
            Self::Vec2(v) => v.extend(0.0),
            Self::Vec3(v) => v,
            Self::Vec4(v) => v.truncate(),
        }
    }

    /// Interpret as a color: scalars become grey, wider values use their first three lanes.
    pub fn to_rgb(&self) -> Rgb {
        Rgb::from_dvec3(self.to_dvec3())
    }

    /// True when any used lane is NaN.
    pub fn has_nan(&self) -> bool {
        self.lanes().iter().take(self.arity()).any(|x| x.is_nan())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Scalar(x)
    }
}

impl From<DVec2> for Value {
    fn from(v: DVec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<DVec3> for Value {
    fn from(v: DVec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<DVec4> for Value {
    fn from(v: DVec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<Rgb> for Value {
    fn from(c: Rgb) -> Self {
        Self::Vec3(c.to_dvec3())
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Arr(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(x) => Ok(Self::Scalar(x)),
            Repr::Arr(v) => {
                if v.is_empty() || v.len() > MAX_ARITY {
                    return Err(serde::de::Error::custom(
                        "value array must have 1 to 4 components",
                    ));
                }
                let mut lanes = [0.0; MAX_ARITY];
                lanes[..v.len()].copy_from_slice(&v);
                Ok(Self::from_lanes(lanes, v.len()))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/value.rs"]
mod tests;
