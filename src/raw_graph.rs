use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::IngestError;
use crate::graph_ast::*;

/// Parse a solver export from JSON text. The text may hold the document
/// itself or a JSON string that encodes it.
pub fn parse_raw_graph(input: &str) -> Result<RawGraph, IngestError> {
    let value: Value = serde_json::from_str(input)?;
    parse_raw_value(value)
}

/// Parse an already-decoded export, decoding it once more if it is a string.
///
/// Only the document shape is checked strictly. Inside `graph.nodes` each
/// record is read field by field: a field of the wrong type reads as absent.
pub fn parse_raw_value(value: Value) -> Result<RawGraph, IngestError> {
    let document = decode_document(value)?;
    let mut document = match document {
        Value::Object(map) => map,
        _ => return Err(IngestError::MissingGraph),
    };
    let mut graph = match document.remove("graph") {
        Some(Value::Object(map)) => map,
        _ => return Err(IngestError::MissingGraph),
    };
    let records = match graph.remove("nodes") {
        Some(Value::Object(map)) => map,
        _ => return Err(IngestError::MissingNodes),
    };

    let nodes = records
        .into_iter()
        .map(|(id, record)| raw_node(id, &record))
        .collect();

    Ok(RawGraph { nodes })
}

fn raw_node(id: String, record: &Value) -> RawNode {
    let dependencies = record
        .get("dependencies")
        .and_then(Value::as_object)
        .map(dependency_flags)
        .unwrap_or_default();

    RawNode {
        id,
        reference: record.get("ref").and_then(Value::as_str).map(str::to_string),
        context_hint: record
            .get("context")
            .filter(|v| v.is_string())
            .and_then(|v| ContextHint::deserialize(v).ok()),
        dependencies,
    }
}

fn dependency_flags(entries: &Map<String, Value>) -> IndexMap<String, DependencyFlags> {
    entries
        .iter()
        .map(|(child, flags)| {
            let flag = |name: &str| flags.get(name).and_then(Value::as_bool).unwrap_or(false);
            let flags = DependencyFlags {
                build: flag("build"),
                test: flag("test"),
            };
            (child.clone(), flags)
        })
        .collect()
}

/// Storage hands the graph over either as an object or as its JSON string
/// encoding. Unwrap one level of string so the rest only sees objects.
pub fn decode_document(value: Value) -> Result<Value, IngestError> {
    match value {
        Value::String(text) => Ok(serde_json::from_str(&text)?),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "graph": {
            "nodes": {
                "0": {"ref": "app/1.0", "dependencies": {"2": {"build": true}, "1": {}}},
                "1": {"ref": "zlib/1.3.1#abc", "context": "host"},
                "2": {"ref": "cmake/3.27", "context": "build", "dependencies": {}}
            }
        }
    }"#;

    #[test]
    fn parse_preserves_declaration_order() {
        let graph = parse_raw_graph(SAMPLE).unwrap();
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);

        let deps: Vec<&str> = graph.nodes[0].dependencies.keys().map(String::as_str).collect();
        assert_eq!(deps, vec!["2", "1"], "dependency order kept");
    }

    #[test]
    fn parse_flags_default_false() {
        let graph = parse_raw_graph(SAMPLE).unwrap();
        let root = &graph.nodes[0];
        assert_eq!(root.dependencies["1"], DependencyFlags::default());
        assert_eq!(root.dependencies["2"], DependencyFlags { build: true, test: false });
    }

    #[test]
    fn parse_context_hints() {
        let graph = parse_raw_graph(SAMPLE).unwrap();
        assert_eq!(graph.nodes[0].context_hint, None);
        assert_eq!(graph.nodes[1].context_hint, Some(ContextHint::Unspecified));
        assert_eq!(graph.nodes[2].context_hint, Some(ContextHint::Build));
    }

    #[test]
    fn parse_string_encoded_document() {
        let encoded = serde_json::to_string(SAMPLE).unwrap();
        let graph = parse_raw_graph(&encoded).unwrap();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes[1].reference.as_deref(), Some("zlib/1.3.1#abc"));
    }

    #[test]
    fn parse_ignores_extra_fields_and_nulls() {
        let input = r#"{"graph": {"nodes": {
            "0": {"ref": null, "recipe": "Consumer", "dependencies": {"1": {"build": null, "test": true, "direct": true}}},
            "1": {"ref": "gtest/1.14.0", "package_id": "abc"}
        }}}"#;
        let graph = parse_raw_graph(input).unwrap();
        assert_eq!(graph.nodes[0].reference, None);
        assert_eq!(graph.nodes[0].dependencies["1"], DependencyFlags { build: false, test: true });
    }

    #[test]
    fn parse_invalid_json_is_error() {
        let err = parse_raw_graph("{not json").unwrap_err();
        assert!(matches!(err, IngestError::Json(_)), "got: {err}");
    }

    #[test]
    fn parse_missing_graph_is_error() {
        let err = parse_raw_graph(r#"{"nodes": {}}"#).unwrap_err();
        assert!(matches!(err, IngestError::MissingGraph), "got: {err}");
    }

    #[test]
    fn parse_missing_nodes_is_error() {
        let err = parse_raw_graph(r#"{"graph": {}}"#).unwrap_err();
        assert!(matches!(err, IngestError::MissingNodes), "got: {err}");
    }

    #[test]
    fn parse_string_that_is_not_a_document() {
        let err = parse_raw_graph(r#""hello""#).unwrap_err();
        assert!(matches!(err, IngestError::Json(_)), "got: {err}");
    }

    #[test]
    fn parse_keeps_numeric_ids_in_declaration_order() {
        let input = r#"{"graph": {"nodes": {"2": {}, "10": {}, "1": {}}}}"#;
        let graph = parse_raw_graph(input).unwrap();
        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "10", "1"]);
    }

    #[test]
    fn parse_odd_fields_read_as_absent() {
        let input = r#"{"graph": {"nodes": {
            "0": {"ref": "app/1.0", "dependencies": {"1": null, "2": {"build": "yes", "test": true}}},
            "1": {"ref": 7, "context": 3},
            "2": {"ref": "cmake/3.27", "dependencies": [1, 2]},
            "3": null
        }}}"#;
        let graph = parse_raw_graph(input).unwrap();
        assert_eq!(graph.nodes.len(), 4);

        let root = &graph.nodes[0];
        assert_eq!(root.dependencies["1"], DependencyFlags::default());
        assert_eq!(root.dependencies["2"], DependencyFlags { build: false, test: true });

        assert_eq!(graph.nodes[1].reference, None);
        assert_eq!(graph.nodes[1].context_hint, None);
        assert!(graph.nodes[2].dependencies.is_empty());
        assert_eq!(graph.nodes[3], RawNode { id: "3".to_string(), ..RawNode::default() });
    }
}
