use crate::foundation::error::{ProcfieldError, ProcfieldResult};
use crate::graph::builder::GraphBuilder;
use crate::graph::node::{BinaryOp, Func, NodeId, UnaryOp};
use crate::graph::program::Graph;
use crate::graph::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Declarative graph description, the JSON boundary for [`build_graph`].
///
/// Nodes may appear in any order and refer to each other by string id:
///
/// ```json
/// {
///   "nodes": [
///     { "id": "p", "op": "uv" },
///     { "id": "n", "op": "call", "func": { "name": "value_noise" }, "args": ["p"] }
///   ],
///   "outputs": [{ "name": "density", "node": "n" }]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphSpec {
    /// Node declarations.
    pub nodes: Vec<NodeSpec>,
    /// Outputs; the first is primary.
    pub outputs: Vec<OutputSpec>,
}

/// One named output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Output name.
    pub name: String,
    /// Id of the node producing it.
    pub node: String,
}

/// One node declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique id referenced by other nodes and outputs.
    pub id: String,
    /// Operation and operands.
    #[serde(flatten)]
    pub op: OpSpec,
}

/// Operation of a [`NodeSpec`], tagged by `op`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpSpec {
    /// Literal: a number or an array of 1 to 4 numbers.
    Const {
        /// Literal value.
        value: Value,
    },
    /// Sample coordinate `xy`.
    Uv,
    /// Sample coordinate `xyz`.
    Position,
    /// Elapsed time.
    Time,
    /// Named parameter.
    Param {
        /// Lookup key.
        name: String,
        /// Width (default 1).
        #[serde(default = "default_param_arity")]
        arity: usize,
    },
    /// Single-operand operation.
    Unary {
        /// Operation.
        #[serde(rename = "fn")]
        func: UnaryOp,
        /// Operand id.
        arg: String,
    },
    /// Two-operand operation.
    Binary {
        /// Operation.
        #[serde(rename = "fn")]
        func: BinaryOp,
        /// Left operand id.
        lhs: String,
        /// Right operand id.
        rhs: String,
    },
    /// Built-in function call.
    Call {
        /// Function, tagged by `name`.
        func: Func,
        /// Operand ids.
        args: Vec<String>,
    },
    /// Branch-free select.
    Select {
        /// Condition id.
        cond: String,
        /// Picked where the condition is positive.
        a: String,
        /// Picked elsewhere.
        b: String,
    },
    /// Lane reorder.
    Swizzle {
        /// Operand id.
        arg: String,
        /// `xyzw`/`rgba` mask.
        mask: String,
    },
    /// Lane concatenation.
    Compose {
        /// Part ids.
        parts: Vec<String>,
    },
}

fn default_param_arity() -> usize {
    1
}

impl OpSpec {
    fn refs(&self) -> Vec<&str> {
        match self {
            Self::Const { .. } | Self::Uv | Self::Position | Self::Time | Self::Param { .. } => {
                Vec::new()
            }
            Self::Unary { arg, .. } | Self::Swizzle { arg, .. } => vec![arg.as_str()],
            Self::Binary { lhs, rhs, .. } => vec![lhs.as_str(), rhs.as_str()],
            Self::Call { args, .. } => args.iter().map(String::as_str).collect(),
            Self::Select { cond, a, b } => vec![cond.as_str(), a.as_str(), b.as_str()],
            Self::Compose { parts } => parts.iter().map(String::as_str).collect(),
        }
    }
}

impl GraphSpec {
    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> ProcfieldResult<Self> {
        serde_json::from_str(s).map_err(|e| ProcfieldError::serde(format!("parse graph JSON: {e}")))
    }

    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ProcfieldResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ProcfieldError::serde(format!("parse graph JSON: {e}")))
    }

    /// Parse from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ProcfieldResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ProcfieldError::validation(format!("open graph JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Build the graph described by this document.
    pub fn build(&self) -> ProcfieldResult<Graph> {
        build_graph(self)
    }
}

/// Build an immutable [`Graph`] from a declarative description.
///
/// Fails with [`ProcfieldError::InvalidGraph`] on duplicate ids, references to undefined nodes,
/// dependency cycles (the offending path is reported), and arity mismatches.
#[tracing::instrument(skip(spec), fields(nodes = spec.nodes.len()))]
pub fn build_graph(spec: &GraphSpec) -> ProcfieldResult<Graph> {
    let mut index_by_id = HashMap::<&str, usize>::with_capacity(spec.nodes.len());
    for (i, node) in spec.nodes.iter().enumerate() {
        if node.id.is_empty() {
            return Err(ProcfieldError::invalid_graph("node id must be non-empty"));
        }
        if index_by_id.insert(node.id.as_str(), i).is_some() {
            return Err(ProcfieldError::invalid_graph(format!(
                "duplicate node id '{}'",
                node.id
            )));
        }
    }

    // Dependency edges: operand -> user.
    let mut indeg = vec![0u32; spec.nodes.len()];
    let mut outs: Vec<Vec<usize>> = vec![Vec::new(); spec.nodes.len()];
    for (i, node) in spec.nodes.iter().enumerate() {
        for r in node.op.refs() {
            let Some(&dep) = index_by_id.get(r) else {
                return Err(ProcfieldError::invalid_graph(format!(
                    "node '{}' references undefined node '{r}'",
                    node.id
                )));
            };
            outs[dep].push(i);
            indeg[i] += 1;
        }
    }

    // Kahn topo with deterministic tie-break on declaration order.
    let mut ready: BTreeSet<usize> = (0..spec.nodes.len()).filter(|&i| indeg[i] == 0).collect();
    let mut order = Vec::with_capacity(spec.nodes.len());
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &j in &outs[i] {
            indeg[j] -= 1;
            if indeg[j] == 0 {
                ready.insert(j);
            }
        }
    }

    if order.len() != spec.nodes.len() {
        let cycle = find_cycle(&outs);
        if cycle.is_empty() {
            return Err(ProcfieldError::invalid_graph("node dependency cycle detected"));
        }
        let path = cycle
            .iter()
            .map(|&i| spec.nodes[i].id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(ProcfieldError::invalid_graph(format!(
            "node dependency cycle detected: {path}"
        )));
    }

    let mut b = GraphBuilder::new();
    let mut built: Vec<Option<NodeId>> = vec![None; spec.nodes.len()];
    for i in order {
        let node = &spec.nodes[i];
        let id_of = |name: &str| -> ProcfieldResult<NodeId> {
            index_by_id
                .get(name)
                .and_then(|&k| built[k])
                .ok_or_else(|| ProcfieldError::invalid_graph(format!("node '{name}' not built")))
        };
        let id = match &node.op {
            OpSpec::Const { value } => Ok(b.constant(*value)),
            OpSpec::Uv => Ok(b.uv()),
            OpSpec::Position => Ok(b.position()),
            OpSpec::Time => Ok(b.time()),
            OpSpec::Param { name, arity } => b.param(name.clone(), *arity),
            OpSpec::Unary { func, arg } => b.unary(*func, id_of(arg)?),
            OpSpec::Binary { func, lhs, rhs } => b.binary(*func, id_of(lhs)?, id_of(rhs)?),
            OpSpec::Call { func, args } => {
                let args = args
                    .iter()
                    .map(|a| id_of(a))
                    .collect::<ProcfieldResult<Vec<_>>>()?;
                b.call(func.clone(), &args)
            }
            OpSpec::Select { cond, a, b: other } => {
                let (c, x, y) = (id_of(cond)?, id_of(a)?, id_of(other)?);
                b.select(c, x, y)
            }
            OpSpec::Swizzle { arg, mask } => b.swizzle(id_of(arg)?, mask),
            OpSpec::Compose { parts } => {
                let parts = parts
                    .iter()
                    .map(|p| id_of(p))
                    .collect::<ProcfieldResult<Vec<_>>>()?;
                b.compose(&parts)
            }
        }
        .map_err(|e| match e {
            ProcfieldError::InvalidGraph(msg) => {
                ProcfieldError::invalid_graph(format!("node '{}': {msg}", node.id))
            }
            other => other,
        })?;
        built[i] = Some(id);
    }

    for out in &spec.outputs {
        let id = index_by_id
            .get(out.node.as_str())
            .and_then(|&k| built[k])
            .ok_or_else(|| {
                ProcfieldError::invalid_graph(format!(
                    "output '{}' references undefined node '{}'",
                    out.name, out.node
                ))
            })?;
        b.output(out.name.clone(), id)?;
    }
    b.build()
}

fn find_cycle(outs: &[Vec<usize>]) -> Vec<usize> {
    let n = outs.len();
    let mut state = vec![0u8; n]; // 0=unvisited,1=visiting,2=done
    let mut stack: Vec<usize> = Vec::new();

    fn dfs(
        v: usize,
        outs: &[Vec<usize>],
        state: &mut [u8],
        stack: &mut Vec<usize>,
    ) -> Option<Vec<usize>> {
        state[v] = 1;
        stack.push(v);
        for &to in &outs[v] {
            match state[to] {
                0 => {
                    if let Some(c) = dfs(to, outs, state, stack) {
                        return Some(c);
                    }
                }
                1 => {
                    let pos = stack.iter().position(|&x| x == to).unwrap_or(0);
                    let mut cycle = stack[pos..].to_vec();
                    cycle.push(to);
                    return Some(cycle);
                }
                _ => {}
            }
        }
        stack.pop();
        state[v] = 2;
        None
    }

    for i in 0..n {
        if state[i] == 0
            && let Some(c) = dfs(i, outs, &mut state, &mut stack)
        {
            return c;
        }
    }
    Vec::new()
}

#[cfg(test)]
#[path = "../../tests/unit/graph/document.rs"]
mod tests;
