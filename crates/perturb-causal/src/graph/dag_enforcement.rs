//! Cycle detection using Tarjan's SCC.
//! Used to name the offending nodes when topological construction stalls.

use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;

use super::dependency_graph::DependencyGraph;

/// Strongly connected components that form cycles: components with more
/// than one node, plus single nodes with a self-loop.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<NodeIndex>> {
    tarjan_scc(&graph.graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || scc.iter().any(|&n| graph.graph.contains_edge(n, n)))
        .collect()
}

/// Whether the graph is acyclic.
pub fn is_dag(graph: &DependencyGraph) -> bool {
    find_cycles(graph).is_empty()
}

/// Human-readable description of every cycle, e.g. `A -> B -> C -> A`.
/// Cycles are listed by their sorted member names so the text is stable.
pub fn describe_cycles(graph: &DependencyGraph) -> String {
    let mut parts: Vec<String> = find_cycles(graph)
        .into_iter()
        .map(|scc| {
            let mut names: Vec<&str> = scc.iter().map(|&n| graph.name(n)).collect();
            names.sort_unstable();
            if let Some(first) = names.first().copied() {
                names.push(first);
            }
            names.join(" -> ")
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
