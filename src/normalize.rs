use std::collections::{HashMap, HashSet};

use log::debug;

use crate::graph_ast::*;
use crate::reference::parse_ref;

pub const DEFAULT_ROOT_ID: &str = "0";

/// Turn raw solver nodes into the canonical node/edge model.
///
/// Every raw node yields exactly one [`GraphNode`], in declaration order.
/// Every dependency entry yields one [`GraphEdge`], including entries whose
/// target id is not in the export; the layout stage drops those.
pub fn normalize(raw: &RawGraph, root_id: &str) -> DependencyGraph {
    if raw.nodes.is_empty() {
        return DependencyGraph::default();
    }

    let root_index = pick_root(raw, root_id);
    debug!("normalize: root is node {:?}", raw.nodes[root_index].id);

    let mut nodes: Vec<GraphNode> = raw
        .nodes
        .iter()
        .enumerate()
        .map(|(i, raw_node)| build_node(raw_node, i == root_index))
        .collect();

    let index: HashMap<&str, usize> = raw
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut edges = Vec::new();
    for parent in &raw.nodes {
        for (child_id, flags) in &parent.dependencies {
            let context = Context::from_flags(*flags);
            if let Some(&child) = index.get(child_id.as_str()) {
                let node = &mut nodes[child];
                if !node.is_root {
                    node.context = promote(node.context, context);
                }
            }
            edges.push(GraphEdge {
                from: parent.id.clone(),
                to: child_id.clone(),
                context,
            });
        }
    }

    DependencyGraph { nodes, edges }
}

fn build_node(raw: &RawNode, is_root: bool) -> GraphNode {
    let reference = raw.reference.clone().unwrap_or_default();
    let parsed = parse_ref(&reference);
    GraphNode {
        id: raw.id.clone(),
        name: parsed.name,
        version: parsed.version,
        reference,
        is_root,
        context: Context::Requires,
    }
}

/// Resolve a node's context given one more incoming edge. A `requires`
/// edge never changes an already resolved kind; `test` outranks `build`.
fn promote(current: Context, incoming: Context) -> Context {
    match (current, incoming) {
        (_, Context::Requires) => current,
        (Context::Test, _) => Context::Test,
        (_, incoming) => incoming,
    }
}

/// The node matching `root_id`, else the first node nobody depends on,
/// else the first declared node.
fn pick_root(raw: &RawGraph, root_id: &str) -> usize {
    if let Some(i) = raw.nodes.iter().position(|n| n.id == root_id) {
        return i;
    }

    let known: HashSet<&str> = raw.nodes.iter().map(|n| n.id.as_str()).collect();
    let targeted: HashSet<&str> = raw
        .nodes
        .iter()
        .flat_map(|n| n.dependencies.keys())
        .map(String::as_str)
        .filter(|id| known.contains(id))
        .collect();

    raw.nodes
        .iter()
        .position(|n| !targeted.contains(n.id.as_str()))
        .unwrap_or(0)
}
