use serde::Serialize;

use crate::errors::Result;
use crate::graph::Graph;
use super::Cost;


/// An ordered route and what it costs
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathResult {
    pub nodes: Vec<String>, // node ids, start first
    pub total_cost: f64,
}

impl PathResult {

    pub fn new(nodes: Vec<String>, total_cost: f64) -> Self {
        Self { nodes, total_cost }
    }

    /// Flat "no path" form: empty sequence, infinite cost
    pub fn not_found() -> Self {
        Self { nodes: Vec::new(), total_cost: f64::INFINITY }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> Option<&str> {
        self.nodes.first().map(String::as_str)
    }

    pub fn goal(&self) -> Option<&str> {
        self.nodes.last().map(String::as_str)
    }

    /// Number of edges walked
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}


/// Result of a single route query
/// Every engine reports an unreachable goal as `NotFound`; unknown ids are errors instead.
/// A query whose start is its goal is `Found` with a one-node path and zero cost.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathOutcome {
    Found(PathResult),
    NotFound,
}

impl PathOutcome {

    /// Convert a generic search result into an outcome
    pub(crate) fn from_search<N: AsRef<str>>(search: Option<(Vec<N>, Cost)>) -> Self {
        match search {
            Some((nodes, cost)) => PathOutcome::Found(PathResult::new(
                nodes.iter().map(|n| n.as_ref().to_string()).collect(),
                cost.into_inner(),
            )),
            None => PathOutcome::NotFound,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found(_))
    }

    pub fn path(&self) -> Option<&PathResult> {
        match self {
            PathOutcome::Found(path) => Some(path),
            PathOutcome::NotFound => None,
        }
    }

    pub fn cost(&self) -> Option<f64> {
        self.path().map(|p| p.total_cost)
    }

    /// Node ids of the route, empty when there is none
    pub fn nodes(&self) -> &[String] {
        self.path().map(|p| p.nodes.as_slice()).unwrap_or(&[])
    }

    pub fn into_path(self) -> Option<PathResult> {
        match self {
            PathOutcome::Found(path) => Some(path),
            PathOutcome::NotFound => None,
        }
    }
}

impl From<PathOutcome> for PathResult {
    fn from(outcome: PathOutcome) -> Self {
        outcome.into_path().unwrap_or_else(PathResult::not_found)
    }
}


/// A shortest path strategy over a `Graph`
/// `start` and `goal` may be ids or exact names; unknown keys fail with `UnknownLocation`
pub trait ShortestPathEngine {

    fn name(&self) -> &'static str;

    fn shortest_path(&self, graph: &Graph, start: &str, goal: &str) -> Result<PathOutcome>;
}


#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    #[test]
    fn test_from_search() {
        let found = PathOutcome::from_search(Some((vec!["A", "C"], OrderedFloat(3.0))));
        assert_eq!(found.nodes(), &["A".to_string(), "C".to_string()]);
        assert_eq!(found.cost(), Some(3.0));

        let missing = PathOutcome::from_search::<&str>(None);
        assert!(!missing.is_found());
        assert!(missing.nodes().is_empty());
    }

    #[test]
    fn test_flat_form_distinguishes_no_path_from_start_equals_goal() {
        let none: PathResult = PathOutcome::NotFound.into();
        assert!(none.is_empty());
        assert!(none.total_cost.is_infinite());

        let same: PathResult = PathOutcome::Found(PathResult::new(vec!["A".into()], 0.0)).into();
        assert_eq!(same.nodes, vec!["A"]);
        assert_eq!(same.total_cost, 0.0);
        assert_eq!(same.hops(), 0);
        assert_eq!(same.start(), same.goal());
    }
}
