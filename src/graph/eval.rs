use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::foundation::math::{clamp, fract, max, min, mix, smoothstep, step};
use crate::graph::node::{BinaryOp, Func, Input, NodeId, NodeKind, UnaryOp};
use crate::graph::program::Graph;
use crate::graph::value::{MAX_ARITY, Value};
use crate::noise::fractal::{fbm2, fbm3, warp2, warp3};
use crate::noise::hash::{hash12, hash13};
use crate::noise::simplex::simplex3;
use crate::noise::value::{value_noise2, value_noise3};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dimensionality of the sample coordinate a graph is evaluated over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// 2D texture coordinates; `position` is unavailable.
    #[default]
    Planar,
    /// 3D positions; `uv` reads `position.xy`.
    Volume,
}

/// Named external parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<String, Value>);

impl ParamSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a parameter.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.get(name).copied()
    }

    /// Iterate in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything one evaluation reads: domain, coordinate, time and parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvalContext {
    /// Coordinate dimensionality.
    pub domain: Domain,
    /// Sample coordinate. Planar domains ignore `z`.
    pub coord: DVec3,
    /// Elapsed time in seconds.
    pub time: f64,
    /// External parameters.
    pub params: ParamSet,
}

impl EvalContext {
    /// Planar sample at `uv`.
    pub fn planar(uv: DVec2, time: f64) -> Self {
        Self {
            domain: Domain::Planar,
            coord: uv.extend(0.0),
            time,
            params: ParamSet::new(),
        }
    }

    /// Volume sample at `position`.
    pub fn volume(position: DVec3, time: f64) -> Self {
        Self {
            domain: Domain::Volume,
            coord: position,
            time,
            params: ParamSet::new(),
        }
    }

    /// Builder-style parameter insert.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }
}

/// A graph with every free parameter resolved. Evaluation cannot fail.
#[derive(Clone, Debug)]
pub struct BoundGraph {
    graph: Graph,
    domain: Domain,
    params: Vec<Value>,
}

impl Graph {
    /// Resolve parameters and check the domain, once, before any sample is evaluated.
    ///
    /// Fails with [`ProcfieldError::UnboundInput`] when a parameter is missing or has the wrong
    /// width, or when `position` is read in a planar domain. Extra parameters are ignored.
    #[tracing::instrument(skip(self, params), fields(nodes = self.len()))]
    pub fn bind(&self, domain: Domain, params: &ParamSet) -> ProcfieldResult<BoundGraph> {
        if domain == Domain::Planar && self.uses_position() {
            return Err(ProcfieldError::unbound_input(
                "'position' is not available in a planar domain",
            ));
        }
        let mut values = Vec::with_capacity(self.params().len());
        for decl in self.params() {
            let v = params.get(&decl.name).ok_or_else(|| {
                ProcfieldError::unbound_input(format!("missing param '{}'", decl.name))
            })?;
            if v.arity() != decl.arity {
                return Err(ProcfieldError::unbound_input(format!(
                    "param '{}' expects width {}, got {}",
                    decl.name,
                    decl.arity,
                    v.arity()
                )));
            }
            values.push(v);
        }
        Ok(BoundGraph {
            graph: self.clone(),
            domain,
            params: values,
        })
    }
}

impl BoundGraph {
    /// Underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Domain fixed at bind time.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Evaluate the primary output.
    pub fn eval(&self, coord: DVec3, time: f64) -> Value {
        let mut scratch = Vec::new();
        self.eval_with_scratch(coord, time, &mut scratch)
    }

    /// Evaluate the primary output, reusing `scratch` across calls.
    pub fn eval_with_scratch(&self, coord: DVec3, time: f64, scratch: &mut Vec<Value>) -> Value {
        self.run(coord, time, scratch);
        scratch[self.graph.primary_output().1.index()]
    }

    /// Evaluate every output, in declaration order.
    pub fn eval_outputs(&self, coord: DVec3, time: f64, scratch: &mut Vec<Value>) -> Vec<Value> {
        self.run(coord, time, scratch);
        self.graph
            .outputs()
            .map(|(_, id)| scratch[id.index()])
            .collect()
    }

    /// Fill `scratch` with the value of every node.
    pub fn run(&self, coord: DVec3, time: f64, scratch: &mut Vec<Value>) {
        let inner = &self.graph.inner;
        scratch.clear();
        scratch.reserve(inner.nodes.len());
        for (i, node) in inner.nodes.iter().enumerate() {
            let v = match &node.kind {
                NodeKind::Const(v) => *v,
                NodeKind::Input(input) => match input {
                    Input::Uv => Value::Vec2(coord.truncate()),
                    Input::Position => Value::Vec3(coord),
                    Input::Time => Value::Scalar(time),
                    Input::Param { .. } => inner.param_slots[i]
                        .and_then(|slot| self.params.get(usize::from(slot)).copied())
                        .unwrap_or(Value::Scalar(f64::NAN)),
                },
                NodeKind::Unary { op, arg } => eval_unary(*op, scratch[arg.index()]),
                NodeKind::Binary { op, lhs, rhs } => {
                    eval_binary(*op, scratch[lhs.index()], scratch[rhs.index()])
                }
                NodeKind::Call { func, args } => eval_call(func, args, scratch),
                NodeKind::Select { cond, a, b } => Value::zip3(
                    scratch[cond.index()],
                    scratch[a.index()],
                    scratch[b.index()],
                    |c, a, b| if c > 0.0 { a } else { b },
                ),
                NodeKind::Swizzle { arg, lanes } => {
                    let src = scratch[arg.index()].lanes();
                    let mut out = [0.0; MAX_ARITY];
                    for (dst, &l) in out.iter_mut().zip(lanes) {
                        *dst = src[usize::from(l)];
                    }
                    Value::from_lanes(out, lanes.len())
                }
                NodeKind::Compose { parts } => {
                    let mut out = [0.0; MAX_ARITY];
                    let mut at = 0;
                    for p in parts {
                        let v = scratch[p.index()];
                        let n = v.arity();
                        out[at..at + n].copy_from_slice(&v.lanes()[..n]);
                        at += n;
                    }
                    Value::from_lanes(out, at)
                }
            };
            scratch.push(v);
        }
    }
}

fn eval_unary(op: UnaryOp, v: Value) -> Value {
    match op {
        UnaryOp::Neg => v.map(|x| -x),
        UnaryOp::Abs => v.map(f64::abs),
        UnaryOp::Floor => v.map(f64::floor),
        UnaryOp::Fract => v.map(fract),
        UnaryOp::Sin => v.map(f64::sin),
        UnaryOp::Cos => v.map(f64::cos),
        UnaryOp::Sqrt => v.map(f64::sqrt),
        UnaryOp::Length => Value::Scalar(length(v)),
        UnaryOp::Normalize => {
            let len = length(v);
            if len == 0.0 {
                v.map(|_| 0.0)
            } else {
                v.map(|x| x / len)
            }
        }
    }
}

fn length(v: Value) -> f64 {
    v.lanes()
        .iter()
        .take(v.arity())
        .map(|x| x * x)
        .sum::<f64>()
        .sqrt()
}

fn eval_binary(op: BinaryOp, a: Value, b: Value) -> Value {
    match op {
        BinaryOp::Add => a.zip(b, |x, y| x + y),
        BinaryOp::Sub => a.zip(b, |x, y| x - y),
        BinaryOp::Mul => a.zip(b, |x, y| x * y),
        BinaryOp::Div => a.zip(b, |x, y| x / y),
        BinaryOp::Min => a.zip(b, min),
        BinaryOp::Max => a.zip(b, max),
        BinaryOp::Pow => a.zip(b, f64::powf),
        BinaryOp::Step => a.zip(b, step),
        BinaryOp::Lt => a.zip(b, |x, y| if x < y { 1.0 } else { 0.0 }),
        BinaryOp::Gt => a.zip(b, |x, y| if x > y { 1.0 } else { 0.0 }),
        BinaryOp::Dot => {
            let (x, y) = (a.lanes(), b.lanes());
            Value::Scalar((0..a.arity()).map(|i| x[i] * y[i]).sum())
        }
        BinaryOp::Cross => Value::Vec3(a.to_dvec3().cross(b.to_dvec3())),
    }
}

fn eval_call(func: &Func, args: &[NodeId], slots: &[Value]) -> Value {
    let arg = |i: usize| slots[args[i].index()];
    match func {
        Func::Clamp => Value::zip3(arg(0), arg(1), arg(2), clamp),
        Func::Mix => Value::zip3(arg(0), arg(1), arg(2), mix),
        Func::Smoothstep => Value::zip3(arg(0), arg(1), arg(2), smoothstep),
        Func::Hash => Value::Scalar(match arg(0) {
            Value::Vec2(p) => hash12(p),
            v => hash13(v.to_dvec3()),
        }),
        Func::ValueNoise => Value::Scalar(match arg(0) {
            Value::Vec2(p) => value_noise2(p),
            v => value_noise3(v.to_dvec3()),
        }),
        Func::Simplex3 => Value::Scalar(simplex3(arg(0).to_dvec3())),
        Func::Fbm { params } => Value::Scalar(match arg(0) {
            Value::Vec2(p) => fbm2(p, params),
            v => fbm3(v.to_dvec3(), params),
        }),
        Func::Warp { params, warp } => Value::Scalar(match arg(0) {
            Value::Vec2(p) => warp2(p, params, warp),
            v => warp3(v.to_dvec3(), params, warp),
        }),
        Func::Colormap { colormap } => colormap.eval(arg(0).x()).into(),
    }
}

/// Bind `ctx.params` and evaluate the primary output at `ctx.coord`.
///
/// Prefer [`Graph::bind`] plus [`BoundGraph::eval_with_scratch`] when sampling many points.
pub fn evaluate(graph: &Graph, ctx: &EvalContext) -> ProcfieldResult<Value> {
    let bound = graph.bind(ctx.domain, &ctx.params)?;
    Ok(bound.eval(ctx.coord, ctx.time))
}

#[cfg(test)]
#[path = "../../tests/unit/graph/eval.rs"]
mod tests;
