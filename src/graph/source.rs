use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use super::{Edge, Node};


/// Supplies the locations and connections a `Graph` is built from
pub trait GraphSource {
    fn nodes(&self) -> Result<Vec<Node>>;
    fn edges(&self) -> Result<Vec<Edge>>;
}


/// Borrowed, in-memory tables
#[derive(Clone, Copy, Debug)]
pub struct StaticSource<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
}

impl<'a> StaticSource<'a> {
    pub fn new(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        Self { nodes, edges }
    }
}

impl GraphSource for StaticSource<'_> {
    fn nodes(&self) -> Result<Vec<Node>> {
        Ok(self.nodes.to_vec())
    }

    fn edges(&self) -> Result<Vec<Edge>> {
        Ok(self.edges.to_vec())
    }
}


/// Map document in JSON:
/// `{ "nodes": [{"id", "name", "x", "y", "category"}], "edges": [{"source", "target", "weight", ...}] }`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JsonSource {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl JsonSource {

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl GraphSource for JsonSource {
    fn nodes(&self) -> Result<Vec<Node>> {
        Ok(self.nodes.clone())
    }

    fn edges(&self) -> Result<Vec<Edge>> {
        Ok(self.edges.clone())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NavigateError;
    use crate::graph::Graph;

    const MAP: &str = r#"{
        "nodes": [
            {"id": "gate1", "name": "Main Gate", "x": 0.0, "y": 0.0, "category": "gate"},
            {"id": "bus1", "name": "Main Bus Stop", "x": 0.0, "y": 25.0, "category": "transport"},
            {"name": "Great Hall", "x": 300.0, "y": 100.0}
        ],
        "edges": [
            {"source": "gate1", "target": "bus1", "weight": 25, "secondary_weight": 1, "category": "paved_walkway"},
            {"source": "gate1", "target": "Great Hall", "weight": 320, "secondary_weight": 4},
            {"source": "gate1", "target": "gate2", "weight": 450}
        ]
    }"#;

    #[test]
    fn test_json_source_builds_graph_and_skips_dangling_edge() {
        let source = JsonSource::parse(MAP).unwrap();
        let (graph, report) = Graph::from_source(&source).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(
            &report.skipped[0],
            NavigateError::MalformedEdge { from, to } if from == "gate1" && to == "gate2"
        ));

        assert_eq!(graph.neighbors("Great Hall").len(), 1);
        assert_eq!(graph.node("bus1").unwrap().category(), Some("transport"));
    }

    #[test]
    fn test_static_source() {
        let nodes = [Node::named("A", 0.0, 0.0), Node::named("B", 1.0, 0.0)];
        let edges = [Edge::new("A", "B", 1.0)];

        let (graph, report) = Graph::from_source(&StaticSource::new(&nodes, &edges)).unwrap();
        assert!(report.is_clean());
        assert_eq!(graph.neighbors("B")[0].target, "A");
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        assert!(matches!(JsonSource::parse("{ nodes: "), Err(NavigateError::Parse(_))));
    }
}
