//! The causal model: a built graph of nodes sampled from one seeded stream.

pub(crate) mod build;
pub mod ensemble;
mod sample;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use perturb_core::config::PerturbConfig;
use perturb_core::constants::ROOT;
use perturb_core::errors::{PerturbErrorCode, PerturbResult};
use tracing::{info, warn};

pub use ensemble::ModelEnsemble;

use self::build::{construct_nodes, BuildMode};
use crate::graph::{DagSpec, DependencyGraph, Edge};
use crate::nodes::{CausalMechanism, Node};
use crate::registry::GeneratorRegistry;
use crate::stream::RandomStream;

/// Lifecycle of a model. A model only exists once it is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Built,
    Sampled,
}

#[derive(Debug, Clone)]
pub struct CausalModel {
    pub(crate) configuration: DagSpec,
    pub(crate) nodes: Vec<Node>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) graph: DependencyGraph,
    pub(crate) stream: RandomStream,
    pub(crate) state: ModelState,
    pub(crate) samples_drawn: u64,
}

impl CausalModel {
    /// Build a fresh model with the built-in generators.
    /// Without a seed, one is drawn and logged.
    pub fn new(spec: DagSpec, seed: Option<u64>) -> PerturbResult<Self> {
        Self::with_registry(spec, seed, &GeneratorRegistry::with_defaults())
    }

    /// Build a fresh model, resolving the generation method in `registry`.
    pub fn with_registry(spec: DagSpec, seed: Option<u64>, registry: &GeneratorRegistry) -> PerturbResult<Self> {
        let seed = seed.unwrap_or_else(|| {
            let generated = RandomStream::generated_seed();
            info!(seed = generated, "no seed supplied, generated one");
            generated
        });
        Self::build(spec, seed, registry, BuildMode::Fresh)
    }

    /// Build a fresh model taking the seed from `config`.
    pub fn with_config(spec: DagSpec, config: &PerturbConfig) -> PerturbResult<Self> {
        Self::new(spec, config.sampling.seed)
    }

    pub fn from_yaml_str(yaml: &str, seed: Option<u64>) -> PerturbResult<Self> {
        Self::new(DagSpec::from_yaml_str(yaml)?, seed)
    }

    pub fn from_file(path: &Path, seed: Option<u64>) -> PerturbResult<Self> {
        Self::new(DagSpec::from_file(path)?, seed)
    }

    pub(crate) fn build(
        spec: DagSpec,
        seed: u64,
        registry: &GeneratorRegistry,
        mode: BuildMode,
    ) -> PerturbResult<Self> {
        Self::try_build(spec, seed, registry, mode).inspect_err(|e| {
            warn!(error_code = e.error_code(), error = %e, seed, "graph build failed");
        })
    }

    fn try_build(spec: DagSpec, seed: u64, registry: &GeneratorRegistry, mode: BuildMode) -> PerturbResult<Self> {
        info!(method = %spec.dag_generation_method, nodes = spec.node_list.len(), seed, "building causal model");
        let generator = registry.create(&spec.dag_generation_method)?;
        generator.ensure_valid_config(&spec)?;
        let (node_specs, edges) = generator.select_nodes_and_edges(&spec);

        let mut stream = RandomStream::new(seed);
        let nodes = construct_nodes(&node_specs, &edges, &mut stream, mode)?;
        stream.begin_sampling();

        let graph = DependencyGraph::from_parts(nodes.iter().map(|n| n.name()), &edges);
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name().to_string(), i))
            .collect();

        let restored = mode == BuildMode::Restore;
        info!(
            generator = generator.name(),
            nodes = nodes.len(),
            edges = edges.len(),
            seed,
            restored,
            "causal model built"
        );

        Ok(Self {
            configuration: spec,
            nodes,
            index,
            edges,
            graph,
            stream,
            state: ModelState::Built,
            samples_drawn: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.stream.seed()
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn samples_drawn(&self) -> u64 {
        self.samples_drawn
    }

    /// Nodes in construction order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The spec this model was built from.
    pub fn configuration(&self) -> &DagSpec {
        &self.configuration
    }

    /// Node names in the order they are sampled.
    pub fn topological_order(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name()).collect()
    }

    /// Nodes whose outputs should be rendered: every node when `save_all`,
    /// otherwise only nodes without children. Construction order.
    pub fn render_targets(&self, save_all: bool) -> Vec<&str> {
        if save_all {
            return self.topological_order();
        }
        let leaves = self.graph.leaves(ROOT);
        self.nodes
            .iter()
            .map(|n| n.name())
            .filter(|name| leaves.contains(name))
            .collect()
    }

    /// [`CausalModel::render_targets`] with `save_all` taken from `config`.
    pub fn configured_render_targets(&self, config: &PerturbConfig) -> Vec<&str> {
        self.render_targets(config.sampling.effective_save_all())
    }
}

impl fmt::Display for CausalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.nodes.iter().map(|n| n.name()).collect();
        names.sort_unstable();
        write!(f, "CausalModel({})", names.join(", "))
    }
}
