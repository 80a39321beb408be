//! Errors from loading and validating `perturb.toml`.

use super::error_code::{self, PerturbErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("invalid TOML in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("invalid value for `{field}`: {message}")]
    ValidationFailed { field: String, message: String },
}

impl PerturbErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
