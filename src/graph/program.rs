use crate::graph::node::{Input, Node, NodeId, NodeKind};
use std::sync::Arc;

/// A named free parameter a graph expects at bind time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    /// Lookup key.
    pub name: String,
    /// Required width.
    pub arity: usize,
}

#[derive(Debug)]
pub(crate) struct GraphInner {
    pub(crate) nodes: Vec<Node>,
    pub(crate) outputs: Vec<(String, NodeId)>,
    pub(crate) params: Vec<ParamDecl>,
    /// Per node: index into `params` for param inputs.
    pub(crate) param_slots: Vec<Option<u16>>,
    pub(crate) uses_position: bool,
}

/// Immutable expression graph.
///
/// Nodes are stored in topological order and every node is reachable from some output. Cloning is
/// cheap (shared), and a graph can be evaluated from any number of threads once bound.
#[derive(Clone, Debug)]
pub struct Graph {
    pub(crate) inner: Arc<GraphInner>,
}

impl Graph {
    pub(crate) fn from_parts(nodes: Vec<Node>, outputs: Vec<(String, NodeId)>) -> Self {
        let mut params = Vec::<ParamDecl>::new();
        let mut param_slots = vec![None; nodes.len()];
        let mut uses_position = false;
        for (i, node) in nodes.iter().enumerate() {
            match &node.kind {
                NodeKind::Input(Input::Param { name, arity }) => {
                    let slot = match params.iter().position(|p| &p.name == name) {
                        Some(slot) => slot,
                        None => {
                            params.push(ParamDecl {
                                name: name.clone(),
                                arity: usize::from(*arity),
                            });
                            params.len() - 1
                        }
                    };
                    param_slots[i] = u16::try_from(slot).ok();
                }
                NodeKind::Input(Input::Position) => uses_position = true,
                _ => {}
            }
        }
        Self {
            inner: Arc::new(GraphInner {
                nodes,
                outputs,
                params,
                param_slots,
                uses_position,
            }),
        }
    }

    /// All nodes in evaluation order.
    pub fn nodes(&self) -> &[Node] {
        &self.inner.nodes
    }

    /// Number of nodes after pruning.
    pub fn len(&self) -> usize {
        self.inner.nodes.len()
    }

    /// Whether the graph has no nodes. Built graphs always have at least one.
    pub fn is_empty(&self) -> bool {
        self.inner.nodes.is_empty()
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.inner.nodes.get(id.index())
    }

    /// Declared outputs in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.inner.outputs.iter().map(|(n, id)| (n.as_str(), *id))
    }

    /// Node of a named output.
    pub fn output(&self, name: &str) -> Option<NodeId> {
        self.inner
            .outputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    /// Name and node of the first declared output.
    pub fn primary_output(&self) -> (&str, NodeId) {
        let (name, id) = &self.inner.outputs[0];
        (name.as_str(), *id)
    }

    /// Parameters the graph reads, in first-use order.
    pub fn params(&self) -> &[ParamDecl] {
        &self.inner.params
    }

    /// Whether any node reads the 3D sample position.
    pub fn uses_position(&self) -> bool {
        self.inner.uses_position
    }
}
