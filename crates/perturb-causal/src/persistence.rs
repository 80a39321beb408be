//! Saving a built graph with its frozen state, and restoring it without
//! construction draws.

use std::path::Path;

use perturb_core::constants::CUSTOM_DAG;
use perturb_core::errors::{PersistError, PerturbResult};
use tracing::info;

use crate::graph::DagSpec;
use crate::model::build::BuildMode;
use crate::model::CausalModel;
use crate::nodes::CausalMechanism;
use crate::registry::GeneratorRegistry;

/// Persisted graphs are YAML only.
pub fn ensure_yaml_extension(path: &Path) -> Result<(), PersistError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(()),
        _ => Err(PersistError::UnsupportedExtension {
            path: path.display().to_string(),
        }),
    }
}

impl CausalModel {
    /// The loadable form of this graph: every node's frozen state, the edge
    /// list, the seed, and the configuration it was first built from.
    pub fn to_persisted(&self) -> PerturbResult<DagSpec> {
        let original = match &self.configuration.original_configuration {
            Some(inner) => inner.clone(),
            None => serde_yaml::to_value(&self.configuration)?,
        };
        Ok(DagSpec {
            dag_generation_method: CUSTOM_DAG.to_string(),
            node_list: self.nodes.iter().map(|n| n.to_persisted()).collect(),
            edge_list: self.edges.clone(),
            loadable: true,
            seed: Some(self.seed()),
            original_configuration: Some(original),
        })
    }

    pub fn to_yaml_string(&self) -> PerturbResult<String> {
        Ok(self.to_persisted()?.to_yaml_string()?)
    }

    /// Write the loadable form to `path` (`.yaml` or `.yml`).
    pub fn save(&self, path: &Path) -> PerturbResult<()> {
        ensure_yaml_extension(path)?;
        let yaml = self.to_yaml_string()?;
        std::fs::write(path, yaml).map_err(|e| PersistError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        info!(path = %path.display(), nodes = self.nodes.len(), seed = self.seed(), "graph saved");
        Ok(())
    }

    /// Rebuild a graph from its loadable form. Sampling the result
    /// reproduces the samples of the graph it was saved from.
    pub fn from_persisted(spec: DagSpec) -> PerturbResult<Self> {
        if !spec.loadable {
            return Err(PersistError::NotLoadable.into());
        }
        let seed = spec.seed.ok_or(PersistError::MissingSeed)?;
        if spec.dag_generation_method != CUSTOM_DAG {
            return Err(PersistError::UnsupportedGenerator {
                expected: CUSTOM_DAG.to_string(),
                actual: spec.dag_generation_method.clone(),
            }
            .into());
        }
        Self::build(spec, seed, &GeneratorRegistry::with_defaults(), BuildMode::Restore)
    }

    /// Restore a graph saved with [`CausalModel::save`].
    pub fn load(path: &Path) -> PerturbResult<Self> {
        ensure_yaml_extension(path)?;
        let spec = DagSpec::from_file(path)?;
        let model = Self::from_persisted(spec)?;
        info!(path = %path.display(), seed = model.seed(), "graph loaded");
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yaml_extensions_are_accepted() {
        assert!(ensure_yaml_extension(Path::new("dag.yaml")).is_ok());
        assert!(ensure_yaml_extension(Path::new("out/dag_0.yml")).is_ok());
        assert!(ensure_yaml_extension(Path::new("dag.json")).is_err());
        assert!(ensure_yaml_extension(Path::new("dag")).is_err());
    }
}
