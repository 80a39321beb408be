//! Persistence configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PERSIST_EXTENSION;

/// Where and how persisted graphs are written.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Directory for saved graphs. Default: "dags".
    pub output_dir: Option<String>,
    /// File extension for saved graphs, "yaml" or "yml". Default: "yaml".
    pub extension: Option<String>,
}

impl PersistenceConfig {
    /// Returns the effective output directory, defaulting to `dags`.
    pub fn effective_output_dir(&self) -> &str {
        self.output_dir.as_deref().unwrap_or("dags")
    }

    /// Returns the effective extension, defaulting to `yaml`.
    pub fn effective_extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_PERSIST_EXTENSION)
    }
}
