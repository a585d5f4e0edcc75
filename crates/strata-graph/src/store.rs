//! Node/edge container with adjacency indices.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::property::Properties;

/// A converted unit of IR data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique identifier within one graph.
    #[serde(rename = "ID")]
    pub id: String,
    /// Labels categorizing the node; the first is always the IR type name.
    #[serde(rename = "Labels")]
    pub labels: Vec<String>,
    /// Flattened attributes of the node.
    #[serde(rename = "Properties")]
    pub properties: Properties,
}

impl Node {
    /// Create a new node.
    pub fn new(id: impl Into<String>, labels: Vec<String>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            labels,
            properties,
        }
    }

    /// Check if the node carries a label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Look up a string property.
    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

/// A directed, labeled relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "SourceID")]
    pub source_id: String,
    #[serde(rename = "TargetID")]
    pub target_id: String,
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Properties")]
    pub properties: Properties,
}

impl Edge {
    /// Create a new edge with an empty property bag.
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: label.into(),
            properties: Properties::new(),
        }
    }
}

/// Generalized labeled property graph.
///
/// Nodes and edges live in insertion-ordered arenas keyed by their string ID.
/// Adjacency lists hold edge arena indices and are created lazily for any
/// node ID an edge mentions, so an edge may reference an endpoint that has
/// not been added yet.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
    outgoing: HashMap<String, Vec<usize>>,
    incoming: HashMap<String, Vec<usize>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Re-adding an existing ID replaces the node in place.
    pub fn add_node(&mut self, node: Node) {
        self.outgoing.entry(node.id.clone()).or_default();
        self.incoming.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
    }

    /// Add an edge and update adjacency. Re-adding an existing ID replaces
    /// the edge and re-wires its endpoints.
    pub fn add_edge(&mut self, edge: Edge) {
        let (index, previous) = self.edges.insert_full(edge.id.clone(), edge);
        if let Some(previous) = previous {
            detach(&mut self.outgoing, &previous.source_id, index);
            detach(&mut self.incoming, &previous.target_id, index);
        }

        let edge = &self.edges[index];
        self.outgoing
            .entry(edge.source_id.clone())
            .or_default()
            .push(index);
        self.incoming
            .entry(edge.target_id.clone())
            .or_default()
            .push(index);
    }

    /// Look up a node by ID.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up an edge by ID.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Edges leaving a node, in the order they were added.
    pub fn outgoing<'a>(&'a self, node_id: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.adjacent(&self.outgoing, node_id)
    }

    /// Edges arriving at a node, in the order they were added.
    pub fn incoming<'a>(&'a self, node_id: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.adjacent(&self.incoming, node_id)
    }

    fn adjacent<'a>(
        &'a self,
        index: &'a HashMap<String, Vec<usize>>,
        node_id: &str,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        index
            .get(node_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// Target nodes reachable over one outgoing edge, skipping dangling targets.
    pub fn children<'a>(&'a self, node_id: &str) -> impl Iterator<Item = &'a Node> + 'a {
        self.outgoing(node_id)
            .filter_map(move |edge| self.nodes.get(&edge.target_id))
    }

    /// Nodes without incoming edges, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |node| {
            self.incoming
                .get(&node.id)
                .is_none_or(|edges| edges.is_empty())
        })
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when the graph has neither nodes nor edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

fn detach(index: &mut HashMap<String, Vec<usize>>, node_id: &str, edge: usize) {
    if let Some(list) = index.get_mut(node_id) {
        list.retain(|&i| i != edge);
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Graph", 2)?;
        state.serialize_field("Nodes", &self.nodes)?;
        state.serialize_field("Edges", &self.edges)?;
        state.end()
    }
}
