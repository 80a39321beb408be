//! Error handling for perturb.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod distribution_error;
pub mod error_code;
pub mod graph_error;
pub mod node_error;
pub mod persist_error;
pub mod perturb_error;
pub mod registry_error;

pub use config_error::ConfigError;
pub use distribution_error::DistributionError;
pub use error_code::PerturbErrorCode;
pub use graph_error::GraphError;
pub use node_error::NodeError;
pub use persist_error::PersistError;
pub use perturb_error::{PerturbError, PerturbResult};
pub use registry_error::RegistryError;
