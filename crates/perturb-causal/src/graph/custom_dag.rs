//! `CustomDAG`: build exactly the nodes and edges the spec lists.

use perturb_core::constants::CUSTOM_DAG;

use super::generator::DagGenerator;
use super::spec::{DagSpec, Edge, NodeSpec};

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomDag;

impl CustomDag {
    pub fn boxed() -> Box<dyn DagGenerator> {
        Box::new(Self)
    }
}

impl DagGenerator for CustomDag {
    fn name(&self) -> &'static str {
        CUSTOM_DAG
    }

    fn select_nodes_and_edges(&self, spec: &DagSpec) -> (Vec<NodeSpec>, Vec<Edge>) {
        (spec.node_list.clone(), spec.edge_list.clone())
    }
}
