use std::collections::HashSet;

use crate::graph_ast::*;

/// Drop nodes whose id was already seen. First occurrence wins, order kept.
pub fn dedup_nodes(nodes: &[GraphNode]) -> Vec<GraphNode> {
    let mut seen: HashSet<&str> = HashSet::new();
    nodes
        .iter()
        .filter(|n| seen.insert(n.id.as_str()))
        .cloned()
        .collect()
}

/// Drop edges whose `(from, to)` pair was already seen, whatever their context.
pub fn dedup_edges(edges: &[GraphEdge]) -> Vec<GraphEdge> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    edges
        .iter()
        .filter(|e| seen.insert((e.from.as_str(), e.to.as_str())))
        .cloned()
        .collect()
}

/// Concatenate graphs delivered by independent call sites and dedup the result.
pub fn merge_graphs<'a, I>(graphs: I) -> DependencyGraph
where
    I: IntoIterator<Item = &'a DependencyGraph>,
{
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for graph in graphs {
        nodes.extend(graph.nodes.iter().cloned());
        edges.extend(graph.edges.iter().cloned());
    }
    DependencyGraph {
        nodes: dedup_nodes(&nodes),
        edges: dedup_edges(&edges),
    }
}
