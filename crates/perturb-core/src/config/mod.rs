//! Configuration system for perturb.
//! TOML-based, layered resolution: CLI > env > project > defaults.

pub mod perturb_config;
pub mod persistence_config;
pub mod sampling_config;

pub use perturb_config::{CliOverrides, PerturbConfig};
pub use persistence_config::PersistenceConfig;
pub use sampling_config::SamplingConfig;
