/// Convenience result type used across procfield.
pub type ProcfieldResult<T> = Result<T, ProcfieldError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only structural and configuration problems surface here. Numeric edge cases inside a sample
/// (division by zero, NaN coordinates, zero-length normals) propagate as NaN or zero vectors instead.
#[derive(thiserror::Error, Debug)]
pub enum ProcfieldError {
    /// Graph structure is unusable: cycle, undefined reference, arity mismatch.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// A free input referenced by a graph has no binding.
    #[error("unbound input: {0}")]
    UnboundInput(String),

    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A render pass was stopped by its caller between samples.
    #[error("render cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProcfieldError {
    /// Build a [`ProcfieldError::InvalidGraph`] value.
    pub fn invalid_graph(msg: impl Into<String>) -> Self {
        Self::InvalidGraph(msg.into())
    }

    /// Build a [`ProcfieldError::UnboundInput`] value.
    pub fn unbound_input(msg: impl Into<String>) -> Self {
        Self::UnboundInput(msg.into())
    }

    /// Build a [`ProcfieldError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ProcfieldError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
