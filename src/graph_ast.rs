use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of dependency an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    #[default]
    Requires,
    Build,
    Test,
}

impl Context {
    pub fn from_flags(flags: DependencyFlags) -> Self {
        if flags.test {
            Context::Test
        } else if flags.build {
            Context::Build
        } else {
            Context::Requires
        }
    }
}

/// Context hint carried on a raw solver node. Anything the solver writes
/// that is not `build` or `test` (Conan uses `host`) reads as unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextHint {
    Build,
    Test,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DependencyFlags {
    pub build: bool,
    pub test: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawNode {
    pub id: String,
    pub reference: Option<String>,
    pub context_hint: Option<ContextHint>,
    pub dependencies: IndexMap<String, DependencyFlags>,
}

/// Raw solver nodes in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawGraph {
    pub nodes: Vec<RawNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub is_root: bool,
    pub context: Context,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub context: Context,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
