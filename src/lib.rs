//! conan-graph: turn a package solver's dependency export into a layered diagram.
//!
//! The pipeline has two stages. [`normalize`] maps the raw, id-keyed export
//! into [`DependencyGraph`] nodes and edges with a resolved dependency kind.
//! [`layout`] assigns each node a rank by longest path from the root and
//! places ranks top to bottom, each centered under the widest one.

pub mod dedup;
pub mod error;
pub mod graph_ast;
pub mod graph_layout;
pub mod normalize;
pub mod raw_graph;
pub mod reference;

use log::warn;

pub use dedup::merge_graphs;
pub use error::IngestError;
pub use graph_ast::{Context, DependencyGraph, GraphEdge, GraphNode};
pub use graph_layout::{LayoutConfig, LayoutNode, LayoutResult, layout, layout_with_config};
pub use normalize::{DEFAULT_ROOT_ID, normalize};

/// Parse and normalize a stored graph document. A document that cannot be
/// read as a solver export yields an empty graph.
pub fn ingest(input: &str, root_id: &str) -> DependencyGraph {
    match raw_graph::parse_raw_graph(input) {
        Ok(raw) => normalize(&raw, root_id),
        Err(e) => {
            warn!("conan-graph: no dependency graph available: {e}");
            DependencyGraph::default()
        }
    }
}

/// Same as [`ingest`], for a document the caller already decoded.
pub fn ingest_value(value: serde_json::Value, root_id: &str) -> DependencyGraph {
    match raw_graph::parse_raw_value(value) {
        Ok(raw) => normalize(&raw, root_id),
        Err(e) => {
            warn!("conan-graph: no dependency graph available: {e}");
            DependencyGraph::default()
        }
    }
}

/// Ingest a stored document and lay it out in one go.
pub fn layout_document(input: &str, root_id: &str, config: &LayoutConfig) -> LayoutResult {
    let graph = ingest(input, root_id);
    layout_with_config(&graph.nodes, &graph.edges, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ingest_invalid_json_is_empty() {
        assert_eq!(ingest("{oops", DEFAULT_ROOT_ID), DependencyGraph::default());
    }

    #[test]
    fn ingest_missing_nodes_is_empty() {
        let graph = ingest(r#"{"graph": {"edges": []}}"#, DEFAULT_ROOT_ID);
        assert!(graph.is_empty());
    }

    #[test]
    fn ingest_value_accepts_string_encoded_document() {
        let doc = r#"{"graph": {"nodes": {"0": {"ref": "app/1.0"}}}}"#;
        let graph = ingest_value(serde_json::Value::String(doc.to_string()), DEFAULT_ROOT_ID);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.nodes[0].is_root);
    }

    #[test]
    fn layout_document_malformed_is_zero_size() {
        let result = layout_document("null", DEFAULT_ROOT_ID, &LayoutConfig::default());
        assert_eq!(result, LayoutResult::default());
    }

    #[test]
    fn layout_document_works() {
        let doc = r#"{"graph": {"nodes": {
            "0": {"ref": "app/1.0", "dependencies": {"1": {}}},
            "1": {"ref": "zlib/1.3.1"}
        }}}"#;
        let result = layout_document(doc, DEFAULT_ROOT_ID, &LayoutConfig::default());
        assert_eq!(result.rank_count(), 2);
        assert_eq!(result.edges.len(), 1);
    }
}
