use crate::colormap::Colormap;
use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::node::{BinaryOp, Func, Input, Node, NodeId, NodeKind, UnaryOp, parse_swizzle};
use crate::graph::program::Graph;
use crate::graph::value::{MAX_ARITY, Value};
use crate::noise::fractal::{FractalParams, WarpParams};

/// Incremental, arity-checked graph construction.
///
/// Every method validates its operands immediately, so a [`Graph`] produced by [`Self::build`] is
/// well-typed by construction. Operands must come from the same builder.
///
/// Mixed widths follow one broadcast rule: operands of an element-wise operation must have the
/// same arity, or one of them must be a scalar, which is repeated across the other's lanes.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    outputs: Vec<(String, NodeId)>,
}

impl GraphBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind, arity: usize) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            arity: arity as u8,
        });
        id
    }

    fn arity_of(&self, id: NodeId) -> ProcfieldResult<usize> {
        self.nodes
            .get(id.index())
            .map(Node::arity)
            .ok_or_else(|| ProcfieldError::invalid_graph(format!("undefined node #{}", id.0)))
    }

    /// Width of a node already added to this builder.
    pub fn arity(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id.index()).map(Node::arity)
    }

    /// Literal value.
    pub fn constant(&mut self, value: impl Into<Value>) -> NodeId {
        let value = value.into();
        self.push(NodeKind::Const(value), value.arity())
    }

    /// Scalar literal.
    pub fn scalar(&mut self, x: f64) -> NodeId {
        self.constant(x)
    }

    /// Sample coordinate `xy`.
    pub fn uv(&mut self) -> NodeId {
        self.push(NodeKind::Input(Input::Uv), 2)
    }

    /// Sample coordinate `xyz` (volume domains only).
    pub fn position(&mut self) -> NodeId {
        self.push(NodeKind::Input(Input::Position), 3)
    }

    /// Elapsed time.
    pub fn time(&mut self) -> NodeId {
        self.push(NodeKind::Input(Input::Time), 1)
    }

    /// Named parameter of a fixed width. Reusing a name with another width is an error.
    pub fn param(&mut self, name: impl Into<String>, arity: usize) -> ProcfieldResult<NodeId> {
        let name = name.into();
        if name.is_empty() {
            return Err(ProcfieldError::invalid_graph("param name must be non-empty"));
        }
        if !(1..=MAX_ARITY).contains(&arity) {
            return Err(ProcfieldError::invalid_graph(format!(
                "param '{name}' arity must be 1..=4, got {arity}"
            )));
        }
        for node in &self.nodes {
            if let NodeKind::Input(Input::Param { name: n, arity: a }) = &node.kind
                && *n == name
                && usize::from(*a) != arity
            {
                return Err(ProcfieldError::invalid_graph(format!(
                    "param '{name}' declared with arity {a} and {arity}"
                )));
            }
        }
        Ok(self.push(
            NodeKind::Input(Input::Param {
                name,
                arity: arity as u8,
            }),
            arity,
        ))
    }

    /// Single-operand operation.
    pub fn unary(&mut self, op: UnaryOp, arg: NodeId) -> ProcfieldResult<NodeId> {
        let n = self.arity_of(arg)?;
        let arity = match op {
            UnaryOp::Length => 1,
            _ => n,
        };
        Ok(self.push(NodeKind::Unary { op, arg }, arity))
    }

    /// Two-operand operation.
    pub fn binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> ProcfieldResult<NodeId> {
        let a = self.arity_of(lhs)?;
        let b = self.arity_of(rhs)?;
        let arity = match op {
            BinaryOp::Dot => {
                if a != b {
                    return Err(ProcfieldError::invalid_graph(format!(
                        "dot needs equal widths, got {a} and {b}"
                    )));
                }
                1
            }
            BinaryOp::Cross => {
                if a != 3 || b != 3 {
                    return Err(ProcfieldError::invalid_graph(format!(
                        "cross needs two 3-vectors, got {a} and {b}"
                    )));
                }
                3
            }
            _ => broadcast(op_name(op), a, b)?,
        };
        Ok(self.push(NodeKind::Binary { op, lhs, rhs }, arity))
    }

    /// Built-in function call.
    pub fn call(&mut self, func: Func, args: &[NodeId]) -> ProcfieldResult<NodeId> {
        if args.len() != func.arg_count() {
            return Err(ProcfieldError::invalid_graph(format!(
                "{} takes {} argument(s), got {}",
                func.name(),
                func.arg_count(),
                args.len()
            )));
        }
        let widths = args
            .iter()
            .map(|&id| self.arity_of(id))
            .collect::<ProcfieldResult<Vec<_>>>()?;
        let arity = match &func {
            Func::Clamp | Func::Mix | Func::Smoothstep => {
                let ab = broadcast(func.name(), widths[0], widths[1])?;
                broadcast(func.name(), ab, widths[2])?
            }
            Func::Hash | Func::ValueNoise => {
                expect_coord(func.name(), widths[0], &[2, 3])?;
                1
            }
            Func::Simplex3 => {
                expect_coord(func.name(), widths[0], &[3])?;
                1
            }
            Func::Fbm { params } => {
                params.validate()?;
                expect_coord(func.name(), widths[0], &[2, 3])?;
                1
            }
            Func::Warp { params, warp } => {
                params.validate()?;
                warp.validate()?;
                expect_coord(func.name(), widths[0], &[2, 3])?;
                1
            }
            Func::Colormap { .. } => {
                expect_coord(func.name(), widths[0], &[1])?;
                3
            }
        };
        Ok(self.push(
            NodeKind::Call {
                func,
                args: args.to_vec(),
            },
            arity,
        ))
    }

    /// Branch-free select; both branches are always evaluated.
    pub fn select(&mut self, cond: NodeId, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        let c = self.arity_of(cond)?;
        let width = broadcast("select", self.arity_of(a)?, self.arity_of(b)?)?;
        if c != 1 && c != width {
            return Err(ProcfieldError::invalid_graph(format!(
                "select condition must be scalar or width {width}, got {c}"
            )));
        }
        Ok(self.push(NodeKind::Select { cond, a, b }, width))
    }

    /// Reorder or extract lanes with an `xyzw`/`rgba` mask.
    pub fn swizzle(&mut self, arg: NodeId, mask: &str) -> ProcfieldResult<NodeId> {
        let n = self.arity_of(arg)?;
        let lanes = parse_swizzle(mask)
            .ok_or_else(|| ProcfieldError::invalid_graph(format!("bad swizzle mask '{mask}'")))?;
        if let Some(&l) = lanes.iter().find(|&&l| usize::from(l) >= n) {
            return Err(ProcfieldError::invalid_graph(format!(
                "swizzle '{mask}' reads lane {l} of a width-{n} value"
            )));
        }
        let arity = lanes.len();
        Ok(self.push(NodeKind::Swizzle { arg, lanes }, arity))
    }

    /// Concatenate parts into a vector of at most four lanes.
    pub fn compose(&mut self, parts: &[NodeId]) -> ProcfieldResult<NodeId> {
        if parts.is_empty() {
            return Err(ProcfieldError::invalid_graph("compose needs at least one part"));
        }
        let mut arity = 0;
        for &p in parts {
            arity += self.arity_of(p)?;
        }
        if arity > MAX_ARITY {
            return Err(ProcfieldError::invalid_graph(format!(
                "compose produces {arity} lanes, max is {MAX_ARITY}"
            )));
        }
        Ok(self.push(
            NodeKind::Compose {
                parts: parts.to_vec(),
            },
            arity,
        ))
    }

    /// `a + b`
    pub fn add(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Add, a, b)
    }

    /// `a - b`
    pub fn sub(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Sub, a, b)
    }

    /// `a * b`
    pub fn mul(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Mul, a, b)
    }

    /// `a / b`
    pub fn div(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Div, a, b)
    }

    /// Lane-wise minimum.
    pub fn min(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Min, a, b)
    }

    /// Lane-wise maximum.
    pub fn max(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Max, a, b)
    }

    /// `a^b`
    pub fn pow(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Pow, a, b)
    }

    /// `step(edge, x)`
    pub fn step(&mut self, edge: NodeId, x: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Step, edge, x)
    }

    /// `a < b` as `1.0`/`0.0`.
    pub fn lt(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Lt, a, b)
    }

    /// `a > b` as `1.0`/`0.0`.
    pub fn gt(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Gt, a, b)
    }

    /// Dot product.
    pub fn dot(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Dot, a, b)
    }

    /// Cross product.
    pub fn cross(&mut self, a: NodeId, b: NodeId) -> ProcfieldResult<NodeId> {
        self.binary(BinaryOp::Cross, a, b)
    }

    /// `-x`
    pub fn neg(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Neg, x)
    }

    /// `|x|`
    pub fn abs(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Abs, x)
    }

    /// `floor(x)`
    pub fn floor(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Floor, x)
    }

    /// `fract(x)`
    pub fn fract(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Fract, x)
    }

    /// `sin(x)`
    pub fn sin(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Sin, x)
    }

    /// `cos(x)`
    pub fn cos(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Cos, x)
    }

    /// `sqrt(x)`
    pub fn sqrt(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Sqrt, x)
    }

    /// Euclidean length.
    pub fn length(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Length, x)
    }

    /// Unit vector.
    pub fn normalize(&mut self, x: NodeId) -> ProcfieldResult<NodeId> {
        self.unary(UnaryOp::Normalize, x)
    }

    /// `clamp(x, lo, hi)`
    pub fn clamp(&mut self, x: NodeId, lo: NodeId, hi: NodeId) -> ProcfieldResult<NodeId> {
        self.call(Func::Clamp, &[x, lo, hi])
    }

    /// `mix(a, b, t)`
    pub fn mix(&mut self, a: NodeId, b: NodeId, t: NodeId) -> ProcfieldResult<NodeId> {
        self.call(Func::Mix, &[a, b, t])
    }

    /// `smoothstep(e0, e1, x)`
    pub fn smoothstep(&mut self, e0: NodeId, e1: NodeId, x: NodeId) -> ProcfieldResult<NodeId> {
        self.call(Func::Smoothstep, &[e0, e1, x])
    }

    /// Lattice hash in `[0, 1)`.
    pub fn hash(&mut self, p: NodeId) -> ProcfieldResult<NodeId> {
        self.call(Func::Hash, &[p])
    }

    /// Value noise in `[0, 1]`.
    pub fn value_noise(&mut self, p: NodeId) -> ProcfieldResult<NodeId> {
        self.call(Func::ValueNoise, &[p])
    }

    /// Signed simplex noise.
    pub fn simplex3(&mut self, p: NodeId) -> ProcfieldResult<NodeId> {
        self.call(Func::Simplex3, &[p])
    }

    /// Fractal Brownian motion.
    pub fn fbm(&mut self, p: NodeId, params: FractalParams) -> ProcfieldResult<NodeId> {
        self.call(Func::Fbm { params }, &[p])
    }

    /// Domain-warped fBm.
    pub fn warp(
        &mut self,
        p: NodeId,
        params: FractalParams,
        warp: WarpParams,
    ) -> ProcfieldResult<NodeId> {
        self.call(Func::Warp { params, warp }, &[p])
    }

    /// Scalar to RGB.
    pub fn colormap(&mut self, x: NodeId, colormap: Colormap) -> ProcfieldResult<NodeId> {
        self.call(Func::Colormap { colormap }, &[x])
    }

    /// Declare a named output. The first declared output is the primary one.
    pub fn output(&mut self, name: impl Into<String>, id: NodeId) -> ProcfieldResult<()> {
        let name = name.into();
        self.arity_of(id)?;
        if self.outputs.iter().any(|(n, _)| *n == name) {
            return Err(ProcfieldError::invalid_graph(format!(
                "duplicate output '{name}'"
            )));
        }
        self.outputs.push((name, id));
        Ok(())
    }

    /// Finish the graph, dropping nodes no output depends on.
    pub fn build(self) -> ProcfieldResult<Graph> {
        if self.outputs.is_empty() {
            return Err(ProcfieldError::invalid_graph(
                "graph must declare at least one output",
            ));
        }

        let mut live = vec![false; self.nodes.len()];
        for (_, id) in &self.outputs {
            live[id.index()] = true;
        }
        // Operands precede their users, so one reverse sweep marks everything reachable.
        for i in (0..self.nodes.len()).rev() {
            if live[i] {
                for dep in self.nodes[i].kind.operands() {
                    live[dep.index()] = true;
                }
            }
        }

        let mut remap = vec![u32::MAX; self.nodes.len()];
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (i, mut node) in self.nodes.into_iter().enumerate() {
            if !live[i] {
                continue;
            }
            node.kind.remap(&remap);
            remap[i] = nodes.len() as u32;
            nodes.push(node);
        }
        let pruned = live.iter().filter(|l| !**l).count();
        tracing::debug!(kept = nodes.len(), pruned, "graph built");

        let outputs = self
            .outputs
            .into_iter()
            .map(|(name, id)| (name, NodeId(remap[id.index()])))
            .collect();
        Ok(Graph::from_parts(nodes, outputs))
    }
}

fn broadcast(what: &str, a: usize, b: usize) -> ProcfieldResult<usize> {
    if a == b || b == 1 {
        Ok(a)
    } else if a == 1 {
        Ok(b)
    } else {
        Err(ProcfieldError::invalid_graph(format!(
            "{what}: cannot combine width {a} with width {b}"
        )))
    }
}

fn expect_coord(what: &str, got: usize, allowed: &[usize]) -> ProcfieldResult<()> {
    if allowed.contains(&got) {
        Ok(())
    } else {
        Err(ProcfieldError::invalid_graph(format!(
            "{what}: operand width {got} not in {allowed:?}"
        )))
    }
}

fn op_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        BinaryOp::Mul => "mul",
        BinaryOp::Div => "div",
        BinaryOp::Min => "min",
        BinaryOp::Max => "max",
        BinaryOp::Pow => "pow",
        BinaryOp::Step => "step",
        BinaryOp::Lt => "lt",
        BinaryOp::Gt => "gt",
        BinaryOp::Dot => "dot",
        BinaryOp::Cross => "cross",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/builder.rs"]
mod tests;
