
pub mod dijkstra;
pub mod a_star;
pub mod floyd_warshall;
pub mod heuristic;
mod path;
mod shortest_path;

pub use path::{PathOutcome, PathResult, ShortestPathEngine};
use shortest_path::shortest_path;

use log::trace;
use ordered_float::OrderedFloat;

use crate::collections::FxIndexMap;
use crate::graph::{Graph, Metric};

/// Search bookkeeping: node -> (index of its parent in this map, cost from the start)
/// The start's parent index is usize::MAX
pub type GraphNodeMap<N, C> = FxIndexMap<N, (usize, C)>;

/// Totally ordered edge cost used as the frontier key
pub type Cost = OrderedFloat<f64>;


/// Neighbor iterator for the generic searches: (neighbor id, edge cost)
/// Edges with no value for `metric` are left out
pub(crate) fn neighbor_costs<'g>(graph: &'g Graph, id: &str, metric: Metric) -> Vec<(&'g str, Cost)> {
    graph
        .neighbors(id)
        .iter()
        .filter_map(|edge| {
            let cost = edge.cost(metric);
            if cost.is_none() {
                trace!("edge {} -> {} has no {metric:?} cost, skipped", edge.source, edge.target);
            }
            // neighbors() only ever holds edges to known nodes
            let target = graph.node(&edge.target)?;
            Some((target.id(), OrderedFloat(cost?)))
        })
        .collect()
}
