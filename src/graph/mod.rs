pub mod analysis;
pub mod source;

use std::hash::{Hash, Hasher};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::collections::FxIndexMap;
use crate::errors::{NavigateError, Result};
use crate::geometry::Point;

pub use source::{GraphSource, JsonSource, StaticSource};


/// Which edge attribute a search minimises
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Distance, // primary weight, metres on the campus data
    Time, // secondary weight, walking minutes
}


/// A named location
/// Identity is the id alone: coordinates and name never take part in equality or hashing
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    id: String,
    name: String,
    point: Point,
    category: Option<String>,
}

impl Node {

    /// Create a node with a distinct id and display name
    pub fn new(id: impl Into<String>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            point: Point::new(x, y),
            category: None,
        }
    }

    /// Create a node whose name doubles as its id
    pub fn named(name: impl Into<String>, x: f64, y: f64) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, x, y)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn x(&self) -> f64 {
        self.point.x
    }

    pub fn y(&self) -> f64 {
        self.point.y
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}


/// Serialized form of a node - `id` may be left out when the name is unique
#[derive(Clone, Debug, Serialize, Deserialize)]
struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let id = match record.id {
            Some(id) if !id.is_empty() => id,
            _ => record.name.clone(),
        };
        Self {
            id,
            name: record.name,
            point: Point::new(record.x, record.y),
            category: record.category,
        }
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        Self {
            id: Some(node.id),
            name: node.name,
            x: node.point.x,
            y: node.point.y,
            category: node.category,
        }
    }
}


/// A weighted connection, directed as stored
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: f64, // metres on the campus data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_weight: Option<u32>, // walking minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>, // path type, e.g. "paved_walkway"
}

impl Edge {

    pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            secondary_weight: None,
            category: None,
        }
    }

    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.secondary_weight = Some(minutes);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Same edge pointing the other way, attributes preserved
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
            weight: self.weight,
            secondary_weight: self.secondary_weight,
            category: self.category.clone(),
        }
    }

    /// Cost of traversing this edge under `metric`
    /// None when the edge carries no value for it, which makes the edge impassable
    pub fn cost(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Distance => Some(self.weight),
            Metric::Time => self.secondary_weight.map(f64::from),
        }
    }
}


/// Outcome of bulk edge insertion
#[derive(Debug, Default)]
pub struct BuildReport {
    pub skipped: Vec<NavigateError>, // edges rejected during construction
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}


/// Undirected weighted graph stored as adjacency lists
/// Every edge is inserted in both directions. Node insertion order is kept and
/// is the order algorithms see nodes in, which keeps tie-breaks reproducible.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: FxIndexMap<String, Node>,
    adjacency: FxIndexMap<String, Vec<Edge>>, // id -> outgoing edges
    edges: Vec<Edge>, // each undirected edge once, as inserted
}

impl Graph {

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from an external data source
    /// Nodes are added first, then edges. Edges that reference missing nodes or carry a
    /// bad weight are logged and skipped, and listed in the returned report.
    pub fn from_source<S: GraphSource + ?Sized>(source: &S) -> Result<(Self, BuildReport)> {
        let mut graph = Self::new();

        for node in source.nodes()? {
            let id = node.id().to_string();
            if !graph.add_node(node) {
                debug!("duplicate location `{id}` ignored");
            }
        }

        let report = graph.extend_edges(source.edges()?);
        debug!(
            "graph built: {} nodes, {} edges, {} skipped",
            graph.node_count(),
            graph.edge_count(),
            report.skipped.len()
        );

        Ok((graph, report))
    }

    /// Add a node
    /// Returns false and leaves the existing node and its edges untouched if the id is taken
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(node.id()) {
            return false;
        }
        self.adjacency.insert(node.id().to_string(), Vec::new());
        self.nodes.insert(node.id().to_string(), node);
        true
    }

    /// Add an undirected edge between two existing nodes
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<()> {
        self.insert_edge(Edge::new(a, b, weight))
    }

    /// Add an undirected edge with all of its attributes
    /// The graph is left unchanged when the edge is rejected
    pub fn insert_edge(&mut self, edge: Edge) -> Result<()> {
        if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
            return Err(NavigateError::MalformedEdge {
                from: edge.source,
                to: edge.target,
            });
        }
        if !(edge.weight >= 0.0) {
            // also catches NaN
            return Err(NavigateError::InvalidWeight {
                from: edge.source,
                to: edge.target,
                weight: edge.weight,
            });
        }

        if edge.source != edge.target {
            let reverse = edge.reversed();
            if let Some(list) = self.adjacency.get_mut(&reverse.source) {
                list.push(reverse);
            }
        }
        if let Some(list) = self.adjacency.get_mut(&edge.source) {
            list.push(edge.clone());
        }
        self.edges.push(edge);

        Ok(())
    }

    /// Insert many edges, skipping and logging the ones that are rejected
    pub fn extend_edges<I>(&mut self, edges: I) -> BuildReport
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut report = BuildReport::default();
        for edge in edges {
            if let Err(e) = self.insert_edge(edge) {
                warn!("skipping edge: {e}");
                report.skipped.push(e);
            }
        }
        report
    }

    /// Outgoing edges of a node - empty for unknown or isolated nodes
    pub fn neighbors(&self, id: &str) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Each undirected edge once, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look a location up by id, falling back to an exact name match
    pub fn resolve(&self, key: &str) -> Result<&Node> {
        self.nodes
            .get(key)
            .or_else(|| self.nodes.values().find(|node| node.name() == key))
            .ok_or_else(|| NavigateError::UnknownLocation(key.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Stable index of a node, its position in insertion order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
