//! Node construction and sampling errors.

use super::error_code::{self, PerturbErrorCode};

/// Errors raised by a single node, always naming it.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("node \"{node}\": unknown node type \"{kind}\"")]
    UnknownKind { node: String, kind: String },

    #[error("node \"{node}\": \"{field}\" not given")]
    MissingField { node: String, field: String },

    #[error("node \"{node}\": invalid \"{field}\": {message}")]
    InvalidParameter {
        node: String,
        field: String,
        message: String,
    },

    #[error("node \"{node}\": severity {value} must be between 0 and 1")]
    SeverityOutOfRange { node: String, value: f64 },

    #[error("node \"{node}\": intervention must set at least one of \"severity_value\" or \"render_value\"")]
    EmptyIntervention { node: String },

    #[error("node \"{node}\": parent \"{parent}\" has not been sampled")]
    MissingParentSample { node: String, parent: String },

    #[error("node \"{node}\": numeric error: {message}")]
    Numeric { node: String, message: String },
}

impl NodeError {
    /// Shorthand for an [`NodeError::InvalidParameter`].
    pub fn invalid(node: &str, field: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            node: node.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`NodeError::MissingField`].
    pub fn missing(node: &str, field: &str) -> Self {
        Self::MissingField {
            node: node.to_string(),
            field: field.to_string(),
        }
    }
}

impl PerturbErrorCode for NodeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Numeric { .. } => error_code::NUMERIC_ERROR,
            _ => error_code::NODE_ERROR,
        }
    }
}
