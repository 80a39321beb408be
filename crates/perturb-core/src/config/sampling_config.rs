//! Sampling configuration.

use serde::{Deserialize, Serialize};

/// Configuration for model construction and sampling.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seed used when the caller supplies none. Unset means a fresh seed per model.
    pub seed: Option<u64>,
    /// Materialize every node for the renderer, not only leaves. Default: false.
    pub save_all: Option<bool>,
}

impl SamplingConfig {
    /// Returns the effective `save_all` flag, defaulting to false.
    pub fn effective_save_all(&self) -> bool {
        self.save_all.unwrap_or(false)
    }
}
