use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::graph::Metric;
use crate::graph_algos::heuristic::HeuristicKind;


/// Which shortest path strategy answers a route query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Dijkstra,
    #[default]
    AStar,
    FloydWarshall,
}


/// Route query settings
/// Every field has a default, so `{}` is a valid configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub algorithm: Algorithm,
    pub metric: Metric,
    pub heuristic: HeuristicKind,
    pub validate_heuristic: bool, // A* refuses to run on a heuristic that could overestimate
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            metric: Metric::default(),
            heuristic: HeuristicKind::default(),
            validate_heuristic: true,
        }
    }
}

impl NavigatorConfig {

    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm, ..Self::default() }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = NavigatorConfig::from_json("{}").unwrap();
        assert_eq!(config, NavigatorConfig::default());
        assert_eq!(config.algorithm, Algorithm::AStar);
        assert_eq!(config.metric, Metric::Distance);
        assert_eq!(config.heuristic, HeuristicKind::Euclidean);
        assert!(config.validate_heuristic);
    }

    #[test]
    fn test_partial_document() {
        let config = NavigatorConfig::from_json(
            r#"{"algorithm": "floyd_warshall", "metric": "time", "heuristic": "zero"}"#
        ).unwrap();
        assert_eq!(config.algorithm, Algorithm::FloydWarshall);
        assert_eq!(config.metric, Metric::Time);
        assert_eq!(config.heuristic, HeuristicKind::Zero);
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        assert!(NavigatorConfig::from_json(r#"{"algorithm": "bellman_ford"}"#).is_err());
    }
}
