//! Registry errors.

use super::error_code::{self, PerturbErrorCode};

/// Errors raised by name-keyed registries.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{kind} \"{name}\" does not exist in the registry")]
    NotFound { kind: &'static str, name: String },
}

impl PerturbErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        error_code::REGISTRY_MISS
    }
}
