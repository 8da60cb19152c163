use crate::errors::Result;
use crate::graph::{Graph, Metric};
use super::{Cost, GraphNodeMap, PathOutcome, ShortestPathEngine, neighbor_costs, shortest_path};

use std::{collections::BinaryHeap, hash::Hash, cmp::Ordering, fmt::Debug};
use log::debug;
use num_traits::Zero;
use rustc_hash::FxHashSet;
use indexmap::map::Entry::{Occupied, Vacant};


/// Cheapest route from `start` to the first node accepted by `goal`
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
/// `neighbors` yields (neighbor, edge cost) pairs; costs must be non-negative.
/// None when no reachable node satisfies `goal`
pub fn dijkstra<N, C, IT, NN, G>(start: N, neighbors: NN, goal: G) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone + Debug,
    NN: Fn(&N) -> IT,
    IT: IntoIterator<Item = (N, C)>,
    C: Zero + Ord + Copy + Debug,
    G: Fn(&N) -> bool,
    {

    let (node_map, goal_index) = settle(start, neighbors, goal);

    shortest_path(&node_map, goal_index?)
}


/// Settle every node reachable from `start`
/// Each entry holds (parent index, cost from start)
pub fn dijkstra_nodes_full<N, C, IT, NN>(start: N, neighbors: NN) -> GraphNodeMap<N, C>
where
    N: Eq + Hash + Clone + Debug,
    NN: Fn(&N) -> IT,
    IT: IntoIterator<Item = (N, C)>,
    C: Zero + Ord + Copy + Debug,
    {

    // a goal that never matches drains the frontier
    let (node_map, _) = settle(start, neighbors, |_| false);

    node_map
}


/// Grow the node map outward from `start`, cheapest frontier entry first
/// Stops as soon as a node matching `goal_fn` is settled and returns its index.
///
/// A cheaper route to a queued node pushes a second frontier entry rather than
/// updating the first; the leftover entry is skipped when it is popped. With
/// non-negative costs a node leaves the heap for the first time at its final cost.
fn settle<N, C, IT, NN, G>(start: N, neighbors: NN, goal_fn: G) -> (GraphNodeMap<N, C>, Option<usize>)
where
    N: Eq + Hash + Clone + Debug,
    NN: Fn(&N) -> IT,
    IT: IntoIterator<Item = (N, C)>,
    C: Zero + Ord + Copy + Debug,
    G: Fn(&N) -> bool
    {

    let mut frontier: BinaryHeap<Frontier<C>> = BinaryHeap::new();

    // parent of the start is usize::MAX
    let mut node_map: GraphNodeMap<N, C> = GraphNodeMap::default();
    let mut settled: FxHashSet<usize> = FxHashSet::default();

    let start_index = node_map.insert_full(start, (usize::MAX, Zero::zero())).0;
    frontier.push(Frontier { index: start_index, cost: Zero::zero() });

    while let Some(Frontier { index, .. }) = frontier.pop() {

        if !settled.insert(index) {
            continue; // stale
        }

        let Some((node, &(_, cost_here))) = node_map.get_index(index) else {
            continue;
        };

        if goal_fn(node) {
            debug!("dijkstra reached {node:?} at cost {cost_here:?} after settling {} nodes", settled.len());
            return (node_map, Some(index));
        }

        for (neighbor, step) in neighbors(node) {
            let through_here = cost_here + step;

            let neighbor_index = match node_map.entry(neighbor) {
                Vacant(slot) => {
                    let i = slot.index();
                    slot.insert((index, through_here));
                    i
                }
                Occupied(mut slot) => {
                    if settled.contains(&slot.index()) || slot.get().1 <= through_here {
                        continue;
                    }
                    slot.insert((index, through_here));
                    slot.index()
                }
            };

            frontier.push(Frontier { index: neighbor_index, cost: through_here });
        }
    }

    debug!("dijkstra frontier exhausted after settling {} nodes", settled.len());
    (node_map, None)
}


/// Heap entry: a node map index and the cost it was queued at
/// Reversed ordering turns the max-heap into a min-heap; equal costs pop in
/// discovery order (lower index first) so runs are reproducible.
#[derive(Debug)]
struct Frontier<T> {
    index: usize,
    cost: T
}

impl<T: Ord> Ord for Frontier<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}
impl<T: Ord> PartialOrd for Frontier<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: PartialEq> PartialEq for Frontier<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.index == other.index
    }
}
impl<T: PartialEq> Eq for Frontier<T> {}


/// Dijkstra over a campus `Graph`
#[derive(Clone, Copy, Debug, Default)]
pub struct Dijkstra {
    pub metric: Metric,
}

impl Dijkstra {

    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    /// Cost from `source` to every reachable node, in settling-discovery order
    /// The source itself is included at cost 0
    pub fn distances_from(&self, graph: &Graph, source: &str) -> Result<Vec<(String, f64)>> {
        let source = graph.resolve(source)?.id();
        let metric = self.metric;

        let node_map = dijkstra_nodes_full(source, |id| neighbor_costs(graph, id, metric));

        Ok(node_map
            .into_iter()
            .map(|(id, (_, cost))| (id.to_string(), cost.into_inner()))
            .collect())
    }
}

impl ShortestPathEngine for Dijkstra {

    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn shortest_path(&self, graph: &Graph, start: &str, goal: &str) -> Result<PathOutcome> {
        let start = graph.resolve(start)?.id();
        let goal = graph.resolve(goal)?.id();
        let metric = self.metric;

        let found: Option<(Vec<&str>, Cost)> = dijkstra(
            start,
            |id| neighbor_costs(graph, id, metric),
            |id| *id == goal,
        );

        Ok(PathOutcome::from_search(found))
    }
}
