//! Name-keyed registries of constructors.

use std::collections::HashMap;

use perturb_core::constants::CUSTOM_DAG;
use perturb_core::errors::RegistryError;
use tracing::warn;

use crate::graph::{CustomDag, DagGenerator};

/// A mapping from names to entries of one kind.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    kind: &'static str,
    entries: HashMap<String, T>,
}

impl<T> Registry<T> {
    /// An empty registry. `kind` names the entries in errors and logs.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Register `entry` under `name`, replacing and returning any previous entry.
    pub fn register(&mut self, name: impl Into<String>, entry: T) -> Option<T> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), entry);
        if previous.is_some() {
            warn!(kind = self.kind, name = %name, "registry entry overwritten");
        }
        previous
    }

    pub fn lookup(&self, name: &str) -> Result<&T, RegistryError> {
        self.entries.get(name).ok_or_else(|| RegistryError::NotFound {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Constructor stored in the generator registry.
pub type GeneratorCtor = fn() -> Box<dyn DagGenerator>;

pub type GeneratorRegistry = Registry<GeneratorCtor>;

impl Registry<GeneratorCtor> {
    /// A registry with the built-in generators.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new("generator");
        registry.register(CUSTOM_DAG, CustomDag::boxed as GeneratorCtor);
        registry
    }

    /// Look up and instantiate a generator.
    pub fn create(&self, name: &str) -> Result<Box<dyn DagGenerator>, RegistryError> {
        self.lookup(name).map(|ctor| ctor())
    }
}

impl Default for Registry<GeneratorCtor> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
