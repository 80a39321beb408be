//! # perturb-core
//!
//! Foundation crate for the perturb causal sampler.
//! Defines errors, config, tracing setup, and constants shared by every
//! other crate in the workspace.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;

pub use config::PerturbConfig;
pub use errors::{PerturbError, PerturbResult};
