//! Top-level perturb configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{PersistenceConfig, SamplingConfig};
use crate::errors::ConfigError;

/// Project config file name looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "perturb.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`PERTURB_*`)
/// 3. Project config (`perturb.toml` in project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PerturbConfig {
    pub sampling: SamplingConfig,
    pub persistence: PersistenceConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub seed: Option<u64>,
    pub save_all: Option<bool>,
    pub output_dir: Option<String>,
}

impl PerturbConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for embedding and tests).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &PerturbConfig) -> Result<(), ConfigError> {
        if let Some(ref ext) = config.persistence.extension {
            if ext != "yaml" && ext != "yml" {
                return Err(ConfigError::ValidationFailed {
                    field: "persistence.extension".to_string(),
                    message: format!("must be \"yaml\" or \"yml\", got \"{ext}\""),
                });
            }
        }
        if let Some(ref dir) = config.persistence.output_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "persistence.output_dir".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut PerturbConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let file_config: PerturbConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut PerturbConfig, other: &PerturbConfig) {
        if other.sampling.seed.is_some() {
            base.sampling.seed = other.sampling.seed;
        }
        if other.sampling.save_all.is_some() {
            base.sampling.save_all = other.sampling.save_all;
        }
        if other.persistence.output_dir.is_some() {
            base.persistence.output_dir = other.persistence.output_dir.clone();
        }
        if other.persistence.extension.is_some() {
            base.persistence.extension = other.persistence.extension.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Unparseable values are logged and ignored.
    fn apply_env_overrides(config: &mut PerturbConfig) {
        if let Ok(val) = std::env::var("PERTURB_SEED") {
            match val.parse::<u64>() {
                Ok(v) => config.sampling.seed = Some(v),
                Err(_) => warn!(var = "PERTURB_SEED", value = %val, "ignoring unparseable override"),
            }
        }
        if let Ok(val) = std::env::var("PERTURB_SAVE_ALL") {
            match val.parse::<bool>() {
                Ok(v) => config.sampling.save_all = Some(v),
                Err(_) => warn!(var = "PERTURB_SAVE_ALL", value = %val, "ignoring unparseable override"),
            }
        }
        if let Ok(val) = std::env::var("PERTURB_OUTPUT_DIR") {
            config.persistence.output_dir = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut PerturbConfig, cli: &CliOverrides) {
        if let Some(v) = cli.seed {
            config.sampling.seed = Some(v);
        }
        if let Some(v) = cli.save_all {
            config.sampling.save_all = Some(v);
        }
        if let Some(ref v) = cli.output_dir {
            config.persistence.output_dir = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
