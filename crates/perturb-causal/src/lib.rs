//! # perturb-causal
//!
//! Causal DAG engine for correlated corruption parameters.
//! Nodes are built from a declarative graph spec, sampled in topological
//! order from one seeded random stream, and persisted to YAML so a frozen
//! graph can be restored and resampled identically.

pub mod distributions;
pub mod graph;
pub mod model;
pub mod nodes;
pub mod output;
pub mod persistence;
pub mod registry;
pub mod stream;

pub use graph::{DagSpec, Edge, Intervention, NodeSpec};
pub use model::{CausalModel, ModelEnsemble, ModelState};
pub use nodes::{CausalMechanism, Node, NodeKind};
pub use output::{NodeOutput, SampleOverrides, SampleResult};
pub use registry::{GeneratorRegistry, Registry};
pub use stream::RandomStream;
