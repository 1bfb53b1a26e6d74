//! Node inspector
//!
//! What the side panel shows for a selected node: a module lists what it
//! depends on, a capability lists what requires it.

use serde::Serialize;

use super::{DependencyGraph, GraphEdge, NodeKind};

/// One row of the inspector panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectorEntry {
    pub id: String,
    pub name: String,
    pub constraint: Option<String>,
}

/// Inspector panel contents for a selected node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Inspection {
    Module {
        id: String,
        name: String,
        dependencies: Vec<InspectorEntry>,
    },
    Capability {
        id: String,
        name: String,
        required_by: Vec<InspectorEntry>,
    },
}

impl Inspection {
    pub fn name(&self) -> &str {
        match self {
            Inspection::Module { name, .. } | Inspection::Capability { name, .. } => name,
        }
    }
}

/// Build the inspector view for `node_id`
///
/// Returns `None` when the node is not part of `graph`, e.g. a selection
/// left over from a previous build.
pub fn inspect(graph: &DependencyGraph, node_id: &str) -> Option<Inspection> {
    let node = graph.node(node_id)?;

    let entry = |edge: &GraphEdge, other: &str| InspectorEntry {
        id: other.to_string(),
        name: graph.name_of(other).to_string(),
        constraint: edge.constraint.clone(),
    };

    Some(match node.kind {
        NodeKind::Module => Inspection::Module {
            id: node.id.clone(),
            name: node.name.clone(),
            dependencies: graph
                .dependencies_of(&node.id)
                .map(|edge| entry(edge, &edge.to))
                .collect(),
        },
        NodeKind::Capability => Inspection::Capability {
            id: node.id.clone(),
            name: node.name.clone(),
            required_by: graph
                .dependents_of(&node.id)
                .map(|edge| entry(edge, &edge.from))
                .collect(),
        },
    })
}
