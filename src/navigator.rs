use std::cell::OnceCell;

use log::debug;

use crate::config::{Algorithm, NavigatorConfig};
use crate::errors::Result;
use crate::graph::Graph;
use crate::graph_algos::a_star::AStar;
use crate::graph_algos::dijkstra::Dijkstra;
use crate::graph_algos::floyd_warshall::{AllPairs, FloydWarshall};
use crate::graph_algos::{PathOutcome, ShortestPathEngine};


/// Route queries over one borrowed graph
/// The graph is never modified; each query keeps its own scratch state. The all-pairs
/// matrices are computed on first use and reused by later radius and landmark queries.
pub struct Navigator<'g> {
    graph: &'g Graph,
    config: NavigatorConfig,
    all_pairs: OnceCell<AllPairs>,
}

impl<'g> Navigator<'g> {

    pub fn new(graph: &'g Graph, config: NavigatorConfig) -> Self {
        Self {
            graph,
            config,
            all_pairs: OnceCell::new(),
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Engine for `algorithm`, set up from the configuration
    pub fn engine(&self, algorithm: Algorithm) -> Box<dyn ShortestPathEngine> {
        let metric = self.config.metric;
        match algorithm {
            Algorithm::Dijkstra => Box::new(Dijkstra::new(metric)),
            Algorithm::AStar => Box::new(AStar {
                metric,
                heuristic: self.config.heuristic,
                validate_heuristic: self.config.validate_heuristic,
            }),
            Algorithm::FloydWarshall => Box::new(FloydWarshall::new(metric)),
        }
    }

    /// Shortest route using the configured algorithm
    pub fn route(&self, start: &str, goal: &str) -> Result<PathOutcome> {
        self.route_with(self.config.algorithm, start, goal)
    }

    /// Shortest route using a specific algorithm
    pub fn route_with(&self, algorithm: Algorithm, start: &str, goal: &str) -> Result<PathOutcome> {
        if algorithm == Algorithm::FloydWarshall {
            // reuse the cached matrices instead of recomputing them
            let start = self.graph.resolve(start)?.id();
            let goal = self.graph.resolve(goal)?.id();
            return self.all_pairs().shortest_path(start, goal);
        }

        let engine = self.engine(algorithm);
        let outcome = engine.shortest_path(self.graph, start, goal)?;
        debug!("{} {start} -> {goal}: {:?}", engine.name(), outcome.cost());
        Ok(outcome)
    }

    /// Shortest distance between two locations, None when unreachable
    pub fn distance(&self, from: &str, to: &str) -> Result<Option<f64>> {
        self.all_pairs().distance(from, to)
    }

    /// Locations within `threshold` of `source`, nearest first, source excluded
    pub fn within_radius(&self, source: &str, threshold: f64) -> Result<Vec<(String, f64)>> {
        self.all_pairs().within_radius(source, threshold)
    }

    /// Route from `from` to `to` through every landmark, nearest landmark first
    pub fn route_via_landmarks<S: AsRef<str>>(&self, from: &str, to: &str, landmarks: &[S]) -> Result<PathOutcome> {
        self.all_pairs().route_via_landmarks(from, to, landmarks)
    }

    /// Cached all-pairs matrices for the configured metric
    pub fn all_pairs(&self) -> &AllPairs {
        self.all_pairs.get_or_init(|| AllPairs::compute(self.graph, self.config.metric))
    }
}
