//! petgraph view of a graph spec's structure, with a name → index map.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::spec::Edge;

/// Directed graph of node names. The `root` sentinel is included when an
/// edge mentions it.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub graph: DiGraph<String, ()>,
    pub node_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from declared node names plus every edge endpoint.
    pub fn from_parts<'a>(names: impl IntoIterator<Item = &'a str>, edges: &[Edge]) -> Self {
        let mut g = Self::new();
        for name in names {
            g.ensure_node(name);
        }
        for edge in edges {
            let parent = g.ensure_node(edge.parent());
            let child = g.ensure_node(edge.child());
            if g.graph.find_edge(parent, child).is_none() {
                g.graph.add_edge(parent, child, ());
            }
        }
        g
    }

    /// Get or insert a node by name.
    pub fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    pub fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Names with no outgoing edges, excluding `exclude`, in insertion order.
    pub fn leaves(&self, exclude: &str) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&i| self.graph[i] != exclude)
            .filter(|&i| {
                self.graph
                    .neighbors_directed(i, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .map(|i| self.graph[i].as_str())
            .collect()
    }
}
