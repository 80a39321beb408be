//! Dependency-ordered node construction.

use std::collections::HashSet;

use perturb_core::constants::ROOT;
use perturb_core::errors::{GraphError, PerturbResult};
use tracing::debug;

use crate::graph::dag_enforcement::{describe_cycles, is_dag};
use crate::graph::{DependencyGraph, Edge, NodeSpec};
use crate::nodes::{CausalMechanism, Node};
use crate::stream::RandomStream;

/// Whether node state is drawn fresh or read back from persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuildMode {
    Fresh,
    Restore,
}

/// Construct every node once all of its parents exist.
///
/// The whole edge set, `root` included, must be acyclic; otherwise this
/// fails with [`GraphError::CycleDetected`] before any node is drawn.
///
/// Each pass walks `specs` in list order, so among nodes that are ready at
/// the same time the earlier spec is built first, and a node made ready by
/// an earlier node in the same pass is built in that pass. The returned
/// nodes are in construction order, which is a valid topological order.
pub(crate) fn construct_nodes(
    specs: &[NodeSpec],
    edges: &[Edge],
    stream: &mut RandomStream,
    mode: BuildMode,
) -> PerturbResult<Vec<Node>> {
    let parents: Vec<Vec<&str>> = specs
        .iter()
        .map(|s| Edge::parents_of(&s.name, edges))
        .collect();
    if let Some(spec) = specs.iter().zip(&parents).find(|(_, p)| p.is_empty()).map(|(s, _)| s) {
        return Err(GraphError::NoParents {
            name: spec.name.clone(),
        }
        .into());
    }
    ensure_acyclic(specs, edges)?;

    let mut built: HashSet<&str> = HashSet::from([ROOT]);
    let mut nodes: Vec<Node> = Vec::with_capacity(specs.len());

    while nodes.len() < specs.len() {
        let mut progressed = false;

        for (spec, spec_parents) in specs.iter().zip(&parents) {
            if built.contains(spec.name.as_str()) || !spec_parents.iter().all(|p| built.contains(p)) {
                continue;
            }

            let parent_names: Vec<String> = spec_parents
                .iter()
                .filter(|p| **p != ROOT)
                .map(|p| p.to_string())
                .collect();

            let mut node = match mode {
                BuildMode::Fresh => Node::build(spec, parent_names, stream)?,
                BuildMode::Restore => Node::restore(spec, parent_names)?,
            };
            if let Some(intervention) = &spec.intervene {
                node = node.intervene(intervention, stream)?;
                debug!(node = %spec.name, "intervention applied");
            }

            debug!(node = %spec.name, kind = %node.kind(), "node constructed");
            built.insert(spec.name.as_str());
            nodes.push(node);
            progressed = true;
        }

        if !progressed {
            let path = specs
                .iter()
                .filter(|s| !built.contains(s.name.as_str()))
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(GraphError::CycleDetected { path }.into());
        }
    }

    Ok(nodes)
}

fn ensure_acyclic(specs: &[NodeSpec], edges: &[Edge]) -> Result<(), GraphError> {
    let graph = DependencyGraph::from_parts(specs.iter().map(|s| s.name.as_str()), edges);
    if is_dag(&graph) {
        return Ok(());
    }
    Err(GraphError::CycleDetected {
        path: describe_cycles(&graph),
    })
}
