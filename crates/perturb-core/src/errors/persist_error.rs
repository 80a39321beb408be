//! Persistence errors for saving and loading graphs.

use super::error_code::{self, PerturbErrorCode};

/// Errors that can occur while serializing or restoring a graph.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("graph spec is not loadable; save a previously built graph to produce one")]
    NotLoadable,

    #[error("loadable graph spec has no recorded seed")]
    MissingSeed,

    #[error("loadable graph spec must use generation method \"{expected}\", got \"{actual}\"")]
    UnsupportedGenerator { expected: String, actual: String },

    #[error("unsupported file extension for {path}: expected .yaml or .yml")]
    UnsupportedExtension { path: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

impl PerturbErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => error_code::IO_ERROR,
            _ => error_code::PERSIST_ERROR,
        }
    }
}
