//! Expression graphs over scalar and small-vector values.
//!
//! Graphs are built once, either in code through [`GraphBuilder`] or from a JSON [`GraphSpec`],
//! then bound to a domain and parameter set and evaluated many times. A bound graph is pure: the
//! same coordinate and time always produce the same value, from any thread.

/// Arity-checked construction.
pub mod builder;
/// JSON boundary and topological construction.
pub mod document;
/// Binding and evaluation.
pub mod eval;
/// Node and operation types.
pub mod node;
/// The immutable graph.
pub mod program;
/// Scalar/vector values.
pub mod value;

pub use builder::GraphBuilder;
pub use document::{GraphSpec, NodeSpec, OpSpec, OutputSpec, build_graph};
pub use eval::{BoundGraph, Domain, EvalContext, ParamSet, evaluate};
pub use node::{BinaryOp, Func, Input, Node, NodeId, NodeKind, UnaryOp};
pub use program::{Graph, ParamDecl};
pub use value::Value;
