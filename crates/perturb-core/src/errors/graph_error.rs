//! Graph schema and structure errors.

use super::error_code::{self, PerturbErrorCode};

/// Errors raised while validating a declarative graph spec or its structure.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph spec must contain a non-empty \"{field}\"")]
    EmptyList { field: &'static str },

    #[error("each node in the node list must have a name")]
    MissingName,

    #[error("cannot use reserved name \"{name}\" for a node")]
    ReservedName { name: String },

    #[error("multiple nodes with name \"{name}\"")]
    DuplicateNode { name: String },

    #[error("edge [{parent}, {child}] references unknown node \"{missing}\"")]
    UnknownEdgeEndpoint {
        parent: String,
        child: String,
        missing: String,
    },

    #[error("node \"{name}\" does not appear in the edge list")]
    OrphanNode { name: String },

    #[error("node \"{name}\" has no parents (add an edge from root)")]
    NoParents { name: String },

    #[error("cycle detected among nodes: {path}")]
    CycleDetected { path: String },
}

impl PerturbErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CycleDetected { .. } => error_code::CYCLE_DETECTED,
            _ => error_code::GRAPH_ERROR,
        }
    }
}
