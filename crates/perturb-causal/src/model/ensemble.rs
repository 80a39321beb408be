//! A set of independently built causal models sampled by index.

use std::path::{Path, PathBuf};

use perturb_core::config::{PersistenceConfig, PerturbConfig};
use perturb_core::errors::{PersistError, PerturbError, PerturbResult};
use tracing::info;

use super::CausalModel;
use crate::graph::DagSpec;
use crate::output::SampleResult;

#[derive(Debug, Clone, Default)]
pub struct ModelEnsemble {
    models: Vec<CausalModel>,
}

impl ModelEnsemble {
    pub fn new(models: Vec<CausalModel>) -> Self {
        Self { models }
    }

    /// Build one model per spec, each seeded with `seed`.
    pub fn from_specs(specs: Vec<DagSpec>, seed: Option<u64>) -> PerturbResult<Self> {
        let models = specs
            .into_iter()
            .map(|spec| CausalModel::new(spec, seed))
            .collect::<PerturbResult<Vec<_>>>()?;
        Ok(Self::new(models))
    }

    /// Restore every graph in `paths`.
    pub fn load(paths: &[PathBuf]) -> PerturbResult<Self> {
        let models = paths
            .iter()
            .map(|p| CausalModel::load(p))
            .collect::<PerturbResult<Vec<_>>>()?;
        Ok(Self::new(models))
    }

    /// Restore every `dag_{i}.yaml` / `dag_{i}.yml` in `dir`, ordered by `i`.
    pub fn load_dir(dir: &Path) -> PerturbResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| PersistError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let mut indexed: Vec<(usize, PathBuf)> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter_map(|path| saved_index(&path).map(|i| (i, path)))
            .collect();
        indexed.sort();
        let paths: Vec<PathBuf> = indexed.into_iter().map(|(_, p)| p).collect();
        Self::load(&paths)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn models(&self) -> &[CausalModel] {
        &self.models
    }

    pub fn model(&self, idx: usize) -> Option<&CausalModel> {
        self.models.get(idx)
    }

    /// Sample the model at `idx`.
    pub fn sample(&mut self, idx: usize) -> PerturbResult<SampleResult> {
        let len = self.models.len();
        self.models
            .get_mut(idx)
            .ok_or(PerturbError::IndexOutOfRange { index: idx, len })?
            .sample()
    }

    /// Save every model into `dir` as `dag_{i}.{ext}`. Returns the written paths.
    pub fn save_dir(&self, dir: &Path, persistence: &PersistenceConfig) -> PerturbResult<Vec<PathBuf>> {
        let io_err = |e: std::io::Error| PersistError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        };
        if dir.is_file() {
            return Err(io_err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "path exists and is not a directory",
            ))
            .into());
        }
        std::fs::create_dir_all(dir).map_err(io_err)?;

        let ext = persistence.effective_extension();
        let mut written = Vec::with_capacity(self.models.len());
        for (i, model) in self.models.iter().enumerate() {
            let path = dir.join(format!("dag_{i}.{ext}"));
            model.save(&path)?;
            written.push(path);
        }
        info!(dir = %dir.display(), models = written.len(), "ensemble saved");
        Ok(written)
    }

    /// Save into the configured output directory.
    pub fn save_configured(&self, config: &PerturbConfig) -> PerturbResult<Vec<PathBuf>> {
        let dir = PathBuf::from(config.persistence.effective_output_dir());
        self.save_dir(&dir, &config.persistence)
    }
}

/// `i` for a file named `dag_{i}.yaml` or `dag_{i}.yml`.
fn saved_index(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?;
    if ext != "yaml" && ext != "yml" {
        return None;
    }
    path.file_stem()?.to_str()?.strip_prefix("dag_")?.parse().ok()
}
