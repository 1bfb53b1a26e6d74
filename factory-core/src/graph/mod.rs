//! Dependency graph
//!
//! Turns a flat list of modules and directed `DEPENDS_ON` relationships into
//! a positioned node/edge graph. Targets that are not known modules become
//! synthesized capability nodes.
//!
//! The graph is rebuilt from scratch for every input change; nodes carry no
//! identity across rebuilds beyond their id.

pub mod inspect;
pub mod layout;
pub mod render;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::module::{ModuleEntity, RelationshipRow};

pub use inspect::{InspectorEntry, Inspection};
pub use render::{Canvas, DrawOp, RecordingCanvas, SvgCanvas};

/// Radius of a drawn node; also the click target
pub const NODE_RADIUS: f64 = 30.0;

/// Label used when an edge endpoint cannot be resolved to a node
pub const UNKNOWN_NODE_NAME: &str = "Unknown";

/// Kind of graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Module,
    Capability,
}

/// A 2-D canvas coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub constraint: Option<String>,
}

/// Positioned module/capability graph
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
}

impl DependencyGraph {
    /// Build the graph from modules and relationships
    ///
    /// Modules are laid out on a three-column grid in input order. Every
    /// `DEPENDS_ON` relationship yields one edge; its target becomes a
    /// capability node if no node with that id exists yet. Other
    /// relationship types are ignored.
    pub fn build(modules: &[ModuleEntity], relationships: &[RelationshipRow]) -> Self {
        let mut graph = Self::default();

        for (i, module) in modules.iter().enumerate() {
            graph.insert(GraphNode {
                id: module.id.clone(),
                name: module.name.clone(),
                kind: NodeKind::Module,
                position: layout::module_position(i),
            });
        }

        for rel in relationships.iter().filter(|r| r.is_dependency()) {
            if !graph.index.contains_key(&rel.to_entity_id) {
                let occupied: Vec<Point> = graph.nodes.iter().map(|n| n.position).collect();
                graph.insert(GraphNode {
                    id: rel.to_entity_id.clone(),
                    name: layout::capability_name(&rel.to_entity_id),
                    kind: NodeKind::Capability,
                    position: layout::capability_position(&rel.to_entity_id, &occupied),
                });
            }

            graph.edges.push(GraphEdge {
                from: rel.from_entity_id.clone(),
                to: rel.to_entity_id.clone(),
                constraint: rel.metadata.version_constraint.clone(),
            });
        }

        tracing::debug!(
            "Built dependency graph: {} node(s), {} edge(s)",
            graph.nodes.len(),
            graph.edges.len()
        );

        graph
    }

    /// First insertion wins
    fn insert(&mut self, node: GraphNode) {
        if self.index.contains_key(&node.id) {
            return;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Display name for an id, falling back to `"Unknown"`
    pub fn name_of(&self, id: &str) -> &str {
        self.node(id)
            .map(|node| node.name.as_str())
            .unwrap_or(UNKNOWN_NODE_NAME)
    }

    /// First node whose drawn circle contains `point`
    pub fn node_at(&self, point: Point) -> Option<&GraphNode> {
        self.nodes
            .iter()
            .find(|node| node.position.distance(point) <= NODE_RADIUS)
    }

    /// Edges leaving `id`
    pub fn dependencies_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |edge| edge.from == id)
    }

    /// Edges arriving at `id`
    pub fn dependents_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |edge| edge.to == id)
    }
}
