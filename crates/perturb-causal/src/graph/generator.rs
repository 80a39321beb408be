//! Graph generators: select the nodes and edges a model is built from.

use std::collections::HashSet;

use perturb_core::constants::ROOT;
use perturb_core::errors::GraphError;

use super::spec::{DagSpec, Edge, NodeSpec};

/// A strategy turning a graph spec into the node and edge lists to build.
pub trait DagGenerator: Send + Sync {
    /// Registry name of this generator.
    fn name(&self) -> &'static str;

    /// Reject specs this generator cannot build from.
    fn ensure_valid_config(&self, spec: &DagSpec) -> Result<(), GraphError> {
        validate_common(spec)
    }

    fn select_nodes_and_edges(&self, spec: &DagSpec) -> (Vec<NodeSpec>, Vec<Edge>);
}

/// Schema checks shared by every generator.
pub fn validate_common(spec: &DagSpec) -> Result<(), GraphError> {
    if spec.node_list.is_empty() {
        return Err(GraphError::EmptyList { field: "node_list" });
    }

    let mut names: HashSet<&str> = HashSet::with_capacity(spec.node_list.len());
    for node in &spec.node_list {
        if node.name.is_empty() {
            return Err(GraphError::MissingName);
        }
        if node.name == ROOT {
            return Err(GraphError::ReservedName {
                name: node.name.clone(),
            });
        }
        if !names.insert(node.name.as_str()) {
            return Err(GraphError::DuplicateNode {
                name: node.name.clone(),
            });
        }
    }

    if spec.edge_list.is_empty() {
        return Err(GraphError::EmptyList { field: "edge_list" });
    }

    let mut mentioned: HashSet<&str> = HashSet::new();
    for edge in &spec.edge_list {
        for endpoint in [edge.parent(), edge.child()] {
            if endpoint != ROOT && !names.contains(endpoint) {
                return Err(GraphError::UnknownEdgeEndpoint {
                    parent: edge.parent().to_string(),
                    child: edge.child().to_string(),
                    missing: endpoint.to_string(),
                });
            }
            mentioned.insert(endpoint);
        }
    }

    if let Some(orphan) = spec
        .node_list
        .iter()
        .find(|n| !mentioned.contains(n.name.as_str()))
    {
        return Err(GraphError::OrphanNode {
            name: orphan.name.clone(),
        });
    }

    Ok(())
}
