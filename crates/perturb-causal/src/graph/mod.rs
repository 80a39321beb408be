//! Graph specs, structure, validation, and generators.

pub mod custom_dag;
pub mod dag_enforcement;
pub mod dependency_graph;
pub mod generator;
pub mod spec;

pub use custom_dag::CustomDag;
pub use dependency_graph::DependencyGraph;
pub use generator::{validate_common, DagGenerator};
pub use spec::{DagSpec, Edge, Intervention, NodeSpec};
