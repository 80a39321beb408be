//! Top-level error aggregating every subsystem.

use super::error_code::{self, PerturbErrorCode};
use super::{ConfigError, GraphError, NodeError, PersistError, RegistryError};

/// Errors surfaced by the public perturb API.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PerturbError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("model index {index} out of range for ensemble of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

impl From<serde_yaml::Error> for PerturbError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Persist(PersistError::Yaml(err))
    }
}

impl PerturbErrorCode for PerturbError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Graph(e) => e.error_code(),
            Self::Node(e) => e.error_code(),
            Self::Registry(e) => e.error_code(),
            Self::Persist(e) => e.error_code(),
            Self::IndexOutOfRange { .. } => error_code::INDEX_OUT_OF_RANGE,
        }
    }
}

/// Convenience alias used across the workspace.
pub type PerturbResult<T> = Result<T, PerturbError>;
