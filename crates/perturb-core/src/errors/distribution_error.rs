//! Distribution parameter errors.

use super::error_code::{self, PerturbErrorCode};

/// Errors raised when a sampling distribution is given invalid parameters
/// or evaluated outside its domain.
#[derive(Debug, thiserror::Error)]
pub enum DistributionError {
    #[error("{distribution}: invalid parameters: {message}")]
    InvalidParameters {
        distribution: &'static str,
        message: String,
    },

    #[error("{distribution}: argument {value} outside domain {domain}")]
    OutOfDomain {
        distribution: &'static str,
        value: f64,
        domain: &'static str,
    },
}

impl PerturbErrorCode for DistributionError {
    fn error_code(&self) -> &'static str {
        error_code::NUMERIC_ERROR
    }
}
