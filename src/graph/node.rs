use crate::colormap::Colormap;
use crate::graph::value::Value;
use crate::noise::fractal::{FractalParams, WarpParams};
use serde::{Deserialize, Serialize};

/// Index of a node inside one graph (or the builder producing it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position in the graph's node list.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Free inputs bound per sample or per binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Sample coordinate `xy` (arity 2).
    Uv,
    /// Sample coordinate `xyz` (arity 3). Only valid in a volume domain.
    Position,
    /// Elapsed time in seconds (arity 1).
    Time,
    /// Named external parameter of fixed arity, bound once per [`crate::BoundGraph`].
    Param {
        /// Lookup key in the [`crate::ParamSet`].
        name: String,
        /// Declared width, `1..=4`.
        arity: u8,
    },
}

/// Element-wise (or reducing) single-operand operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `|x|`
    Abs,
    /// Round toward negative infinity.
    Floor,
    /// `x - floor(x)`
    Fract,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Square root (NaN below zero).
    Sqrt,
    /// Euclidean length; yields a scalar.
    Length,
    /// Unit vector; a zero-length input yields zeros.
    Normalize,
}

/// Two-operand operations. Element-wise unless stated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b` (IEEE semantics on zero).
    Div,
    /// Smaller lane.
    Min,
    /// Larger lane.
    Max,
    /// `a^b`
    Pow,
    /// `step(edge = a, x = b)`
    Step,
    /// `1.0` where `a < b`, else `0.0`.
    Lt,
    /// `1.0` where `a > b`, else `0.0`.
    Gt,
    /// Dot product of equal-width operands; yields a scalar.
    Dot,
    /// Cross product of two 3-vectors.
    Cross,
}

/// Built-in functions available to `call` nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Func {
    /// `clamp(x, lo, hi)`
    Clamp,
    /// `mix(a, b, t)`
    Mix,
    /// `smoothstep(e0, e1, x)`
    Smoothstep,
    /// Lattice hash of a 2D or 3D coordinate to `[0, 1)`.
    Hash,
    /// Value noise of a 2D or 3D coordinate.
    ValueNoise,
    /// Signed simplex noise of a 3D coordinate.
    Simplex3,
    /// Fractal Brownian motion of a 2D or 3D coordinate.
    Fbm {
        /// Octave series.
        #[serde(default)]
        params: FractalParams,
    },
    /// Domain-warped fBm of a 2D or 3D coordinate.
    Warp {
        /// Octave series.
        #[serde(default)]
        params: FractalParams,
        /// Warp nesting.
        #[serde(default)]
        warp: WarpParams,
    },
    /// Scalar to RGB transfer.
    Colormap {
        /// Breakpoints.
        #[serde(default)]
        colormap: Colormap,
    },
}

impl Func {
    /// Number of operands the function takes.
    pub fn arg_count(&self) -> usize {
        match self {
            Self::Clamp | Self::Mix | Self::Smoothstep => 3,
            _ => 1,
        }
    }

    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Mix => "mix",
            Self::Smoothstep => "smoothstep",
            Self::Hash => "hash",
            Self::ValueNoise => "value_noise",
            Self::Simplex3 => "simplex3",
            Self::Fbm { .. } => "fbm",
            Self::Warp { .. } => "warp",
            Self::Colormap { .. } => "colormap",
        }
    }
}

/// Operation of a node. Operands always refer to earlier nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Literal value.
    Const(Value),
    /// Free input.
    Input(Input),
    /// Single-operand operation.
    Unary {
        /// Operation.
        op: UnaryOp,
        /// Operand.
        arg: NodeId,
    },
    /// Two-operand operation.
    Binary {
        /// Operation.
        op: BinaryOp,
        /// Left operand.
        lhs: NodeId,
        /// Right operand.
        rhs: NodeId,
    },
    /// Built-in function call.
    Call {
        /// Function.
        func: Func,
        /// Operands, `func.arg_count()` of them.
        args: Vec<NodeId>,
    },
    /// Branch-free lane-wise select: `cond > 0` picks `a`, anything else (NaN included) picks `b`.
    Select {
        /// Condition.
        cond: NodeId,
        /// Picked where the condition is positive.
        a: NodeId,
        /// Picked elsewhere.
        b: NodeId,
    },
    /// Lane reorder/extract.
    Swizzle {
        /// Source.
        arg: NodeId,
        /// Source lane per output lane.
        lanes: Vec<u8>,
    },
    /// Concatenate operands into one vector.
    Compose {
        /// Parts in lane order.
        parts: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Operands in evaluation order.
    pub fn operands(&self) -> Vec<NodeId> {
        match self {
            Self::Const(_) | Self::Input(_) => Vec::new(),
            Self::Unary { arg, .. } | Self::Swizzle { arg, .. } => vec![*arg],
            Self::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            Self::Call { args, .. } => args.clone(),
            Self::Select { cond, a, b } => vec![*cond, *a, *b],
            Self::Compose { parts } => parts.clone(),
        }
    }

    pub(crate) fn remap(&mut self, map: &[u32]) {
        let fix = |id: &mut NodeId| id.0 = map[id.index()];
        match self {
            Self::Const(_) | Self::Input(_) => {}
            Self::Unary { arg, .. } | Self::Swizzle { arg, .. } => fix(arg),
            Self::Binary { lhs, rhs, .. } => {
                fix(lhs);
                fix(rhs);
            }
            Self::Call { args, .. } => args.iter_mut().for_each(fix),
            Self::Select { cond, a, b } => {
                fix(cond);
                fix(a);
                fix(b);
            }
            Self::Compose { parts } => parts.iter_mut().for_each(fix),
        }
    }
}

/// A node and the width of the value it produces.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) arity: u8,
}

impl Node {
    /// Operation.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Result width, `1..=4`.
    pub fn arity(&self) -> usize {
        usize::from(self.arity)
    }
}

/// Parse a swizzle mask (`xyzw` or `rgba` letters, 1 to 4 of them) into lane indices.
pub fn parse_swizzle(mask: &str) -> Option<Vec<u8>> {
    if mask.is_empty() || mask.len() > 4 {
        return None;
    }
    mask.chars()
        .map(|c| match c {
            'x' | 'r' => Some(0),
            'y' | 'g' => Some(1),
            'z' | 'b' => Some(2),
            'w' | 'a' => Some(3),
            _ => None,
        })
        .collect()
}
