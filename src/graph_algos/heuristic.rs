use serde::{Deserialize, Serialize};

use crate::errors::{NavigateError, Result};
use crate::geometry::Point;
use crate::graph::{Graph, Metric};


/// Relative slack when comparing an estimate against an edge cost
const TOLERANCE: f64 = 1e-9;


/// Remaining-cost estimate used by A*
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    /// Straight-line distance in coordinate units
    #[default]
    Euclidean,
    /// Great-circle metres, coordinates read as (longitude, latitude)
    Haversine,
    /// Always 0 - A* degenerates to Dijkstra
    Zero,
}

impl HeuristicKind {

    pub fn estimate(&self, from: &Point, to: &Point) -> f64 {
        match self {
            HeuristicKind::Euclidean => from.distance(to),
            HeuristicKind::Haversine => from.haversine_distance(to),
            HeuristicKind::Zero => 0.0,
        }
    }

    /// Check the estimate never exceeds the cost of a single edge
    /// By the triangle inequality of the underlying distance this makes the heuristic
    /// consistent, and so admissible, for every route in the graph under `metric`.
    pub fn validate(&self, graph: &Graph, metric: Metric) -> Result<()> {
        if *self == HeuristicKind::Zero {
            return Ok(());
        }

        for edge in graph.edges() {
            let Some(weight) = edge.cost(metric) else {
                continue;
            };
            let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target)) else {
                continue;
            };

            let estimate = self.estimate(&source.point(), &target.point());
            // NaN estimates (non-finite coordinates) fail too
            if !(estimate <= weight * (1.0 + TOLERANCE) + TOLERANCE) {
                return Err(NavigateError::InadmissibleHeuristic {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    weight,
                    estimate,
                });
            }
        }

        Ok(())
    }
}
