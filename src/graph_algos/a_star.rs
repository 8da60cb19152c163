use crate::errors::Result;
use crate::graph::{Graph, Metric};
use super::heuristic::HeuristicKind;
use super::{Cost, GraphNodeMap, PathOutcome, ShortestPathEngine, neighbor_costs, shortest_path};

use std::{
    collections::BinaryHeap,
    hash::Hash,
    fmt::Debug,
    cmp::Ordering
};
use log::debug;
use num_traits::Zero;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;
use indexmap::map::Entry::{Occupied, Vacant};


/// Open list entry
#[derive(Debug)]
struct Candidate<T> {
    index: usize, // position in the node map
    estimate: T, // cost so far + heuristic
}

// Lowest estimate first, ties in discovery order
impl<T: Ord> Ord for Candidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.estimate.cmp(&self.estimate)
            .then_with(|| other.index.cmp(&self.index))
    }
}
impl<T: Ord> PartialOrd for Candidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: PartialEq> PartialEq for Candidate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.estimate == other.estimate && self.index == other.index
    }
}
impl<T: PartialEq> Eq for Candidate<T> {}

/// A* search over a campus `Graph`
/// https://en.wikipedia.org/wiki/A*_search_algorithm
#[derive(Clone, Copy, Debug)]
pub struct AStar {
    pub metric: Metric,
    pub heuristic: HeuristicKind,
    pub validate_heuristic: bool, // refuse to search when the heuristic could overestimate
}

impl Default for AStar {
    fn default() -> Self {
        Self {
            metric: Metric::Distance,
            heuristic: HeuristicKind::Euclidean,
            validate_heuristic: true,
        }
    }
}

impl AStar{

    pub fn new(metric: Metric, heuristic: HeuristicKind) -> Self {
        Self { metric, heuristic, ..Self::default() }
    }

    /// Cheapest route from `start` to the first node accepted by `goal_fn`
    ///
    /// `heuristic_fn` must be consistent: `h(a) <= cost(a, b) + h(b)` for every edge.
    /// Each node is then expanded once, at its final cost, and the result is optimal.
    /// None when no reachable node satisfies `goal_fn`.
    pub fn plan<N, C, IT, NN, H, G>(&self, start: N, neighbors: NN, heuristic_fn: H, goal_fn: G) -> Option<(Vec<N>, C)>
    where
        N: Eq + Hash + Clone + Debug,
        NN: Fn(&N) -> IT,
        H: Fn(&N) -> C,
        IT: IntoIterator<Item = (N, C)>,
        C: Zero + Ord + Copy + Debug,
        G: Fn(&N) -> bool,
        {

        let (node_map, goal_index) = self.explore(start, neighbors, heuristic_fn, goal_fn);

        shortest_path(&node_map, goal_index?)
    }


    /// Expand nodes in estimate order until one satisfies `goal_fn`
    /// Returns every discovered node with (parent index, cost so far) and the goal's index.
    /// A node can be queued more than once; later copies are dropped once it is expanded.
    fn explore<N, C, IT, NN, H, G>(&self, start: N, neighbors: NN, heuristic_fn: H, goal_fn: G) -> (GraphNodeMap<N, C>, Option<usize>)
    where
        N: Eq + Hash + Clone + Debug,
        NN: Fn(&N) -> IT,
        IT: IntoIterator<Item = (N, C)>,
        C: Zero + Ord + Copy + Debug,
        H: Fn(&N) -> C,
        G: Fn(&N) -> bool
    {
        let mut open: BinaryHeap<Candidate<C>> = BinaryHeap::new();

        // parent of the start is usize::MAX
        let mut node_map: GraphNodeMap<N, C> = GraphNodeMap::default();
        let mut expanded: FxHashSet<usize> = FxHashSet::default();

        let start_estimate = heuristic_fn(&start);
        let start_index = node_map.insert_full(start, (usize::MAX, Zero::zero())).0;
        open.push(Candidate { index: start_index, estimate: start_estimate });

        while let Some(Candidate { index, .. }) = open.pop() {

            if !expanded.insert(index) {
                continue;
            }

            let Some((node, &(_, cost_here))) = node_map.get_index(index) else {
                continue;
            };

            if goal_fn(node) {
                debug!("a* reached {node:?} at cost {cost_here:?} after expanding {} nodes", expanded.len());
                return (node_map, Some(index));
            }

            for (neighbor, step) in neighbors(node) {
                let through_here = cost_here + step;
                let remaining = heuristic_fn(&neighbor);

                let neighbor_index = match node_map.entry(neighbor) {
                    Vacant(slot) => {
                        let i = slot.index();
                        slot.insert((index, through_here));
                        i
                    }
                    Occupied(mut slot) => {
                        if expanded.contains(&slot.index()) || slot.get().1 <= through_here {
                            continue;
                        }
                        slot.insert((index, through_here));
                        slot.index()
                    }
                };

                open.push(Candidate { index: neighbor_index, estimate: through_here + remaining });
            }
        }

        debug!("a* open list exhausted after expanding {} nodes", expanded.len());
        (node_map, None)
    }
}

impl ShortestPathEngine for AStar {

    fn name(&self) -> &'static str {
        "a_star"
    }

    fn shortest_path(&self, graph: &Graph, start: &str, goal: &str) -> Result<PathOutcome> {
        let start = graph.resolve(start)?.id();
        let goal_node = graph.resolve(goal)?;
        let goal = goal_node.id();
        let goal_point = goal_node.point();

        if self.validate_heuristic {
            self.heuristic.validate(graph, self.metric)?;
        }

        let metric = self.metric;
        let heuristic = self.heuristic;

        let found: Option<(Vec<&str>, Cost)> = self.plan(
            start,
            |id| neighbor_costs(graph, id, metric),
            |id| OrderedFloat(graph.node(id).map_or(0.0, |n| heuristic.estimate(&n.point(), &goal_point))),
            |id| *id == goal,
        );

        Ok(PathOutcome::from_search(found))
    }
}




#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NavigateError;
    use crate::graph::{Edge, Node as Location};
    use std::collections::HashMap;

    type Walks = HashMap<&'static str, Vec<(&'static str, u32)>>;

    /// Directed walking distances in whole metres
    fn walks(edges: &[(&'static str, &'static str, u32)]) -> Walks {
        let mut map: Walks = HashMap::new();
        for &(from, to, metres) in edges {
            map.entry(from).or_default().push((to, metres));
            map.entry(to).or_default();
        }
        map
    }

    fn step<'a>(map: &'a Walks) -> impl Fn(&&'static str) -> Vec<(&'static str, u32)> + 'a {
        move |at| map.get(at).cloned().unwrap_or_default()
    }

    fn no_estimate(_: &&'static str) -> u32 {
        0
    }

    #[test]
    fn test_plan_without_estimate_matches_dijkstra() {
        let map = walks(&[
            ("Gate", "Hall", 1),
            ("Gate", "Bus Stop", 3),
            ("Hall", "Library", 5),
            ("Bus Stop", "Library", 1),
        ]);

        let (path, metres) = AStar::default()
            .plan("Gate", step(&map), no_estimate, |at| *at == "Library")
            .unwrap();
        assert_eq!(path, vec!["Gate", "Bus Stop", "Library"]);
        assert_eq!(metres, 4);

        let reference = super::super::dijkstra::dijkstra("Gate", step(&map), |at| *at == "Library");
        assert_eq!(reference, Some((path, metres)));
    }

    #[test]
    fn test_plan_unreachable_goal() {
        let map = walks(&[("Gate", "Hall", 1), ("Stadium", "Hospital", 1)]);

        let found = AStar::default().plan("Gate", step(&map), no_estimate, |at| *at == "Hospital");
        assert!(found.is_none());
    }

    #[test]
    fn test_explore_through_a_loop() {
        let map = walks(&[
            ("Gate", "Hall", 1),
            ("Hall", "Cafeteria", 1),
            ("Cafeteria", "Gate", 1),
            ("Cafeteria", "Stadium", 2),
        ]);

        let (node_map, goal) = AStar::default().explore("Gate", step(&map), no_estimate, |at| *at == "Stadium");

        assert!(goal.is_some());
        assert_eq!(node_map["Gate"].1, 0);
        assert_eq!(node_map["Cafeteria"].1, 2);
        assert_eq!(node_map["Stadium"].1, 4);
    }

    #[test]
    fn test_estimate_breaks_ties_toward_the_goal() {
        // Gate(0,0) -> Hall(1,0) -> Library(2,0) and Gate -> Bus Stop(0,1) -> Library both cost 2;
        // grid distance to Library pulls the search through Hall
        let map = walks(&[
            ("Gate", "Hall", 1),
            ("Gate", "Bus Stop", 1),
            ("Hall", "Library", 1),
            ("Bus Stop", "Library", 2),
        ]);
        let grid: HashMap<&str, (i32, i32)> = HashMap::from([
            ("Gate", (0, 0)),
            ("Hall", (1, 0)),
            ("Bus Stop", (0, 1)),
            ("Library", (2, 0)),
        ]);

        let towards_library = |at: &&'static str| {
            let (x, y) = grid[*at];
            ((2 - x).abs() + y.abs()) as u32
        };

        let (path, metres) = AStar::default()
            .plan("Gate", step(&map), towards_library, |at| *at == "Library")
            .unwrap();
        assert_eq!(path, vec!["Gate", "Hall", "Library"]);
        assert_eq!(metres, 2);
    }

    fn campus(edges: &[(&str, &str, f64)], nodes: &[(&str, f64, f64)]) -> Graph {
        let mut graph = Graph::new();
        for (name, x, y) in nodes {
            graph.add_node(Location::named(*name, *x, *y));
        }
        for (a, b, w) in edges {
            graph.add_edge(a, b, *w).unwrap();
        }
        graph
    }

    #[test]
    fn test_engine_simple_path() {
        let graph = campus(
            &[("Bank", "Library", 2.0), ("Library", "Cafeteria", 2.0), ("Bank", "Cafeteria", 10.0)],
            &[("Bank", 2.0, 4.0), ("Library", 5.0, 7.0), ("Cafeteria", 6.0, 1.0)],
        );

        // Coordinates are far apart relative to the weights - skip validation
        let a_star = AStar { validate_heuristic: false, ..AStar::default() };
        let outcome = a_star.shortest_path(&graph, "Bank", "Cafeteria").unwrap();
        assert_eq!(outcome.nodes(), &["Bank", "Library", "Cafeteria"]);
        assert_eq!(outcome.cost(), Some(4.0));

        // Validation catches that straight lines exceed the edge weights
        assert!(matches!(
            AStar::default().shortest_path(&graph, "Bank", "Cafeteria"),
            Err(NavigateError::InadmissibleHeuristic { .. })
        ));
    }

    #[test]
    fn test_engine_direct_path_is_chosen_when_cheaper() {
        let graph = campus(
            &[("A", "C", 3.0), ("A", "B", 5.0), ("B", "C", 5.0)],
            &[("A", 0.0, 0.0), ("B", 1.0, 1.0), ("C", 2.0, 2.0)],
        );

        let outcome = AStar::default().shortest_path(&graph, "A", "C").unwrap();
        assert_eq!(outcome.nodes(), &["A", "C"]);
        assert_eq!(outcome.cost(), Some(3.0));
    }

    #[test]
    fn test_engine_no_path_exists() {
        let graph = campus(&[], &[("A", 0.0, 0.0), ("B", 1.0, 1.0)]);

        let outcome = AStar::default().shortest_path(&graph, "A", "B").unwrap();
        assert_eq!(outcome, PathOutcome::NotFound);
    }

    #[test]
    fn test_engine_start_equals_goal() {
        let graph = campus(&[], &[("A", 0.0, 0.0)]);

        let outcome = AStar::default().shortest_path(&graph, "A", "A").unwrap();
        assert_eq!(outcome.nodes(), &["A"]);
        assert_eq!(outcome.cost(), Some(0.0));
    }

    #[test]
    fn test_engine_haversine_on_geographic_coordinates() {
        // (lon, lat) pairs a few hundred metres apart, weights in metres along walkways
        let mut graph = campus(
            &[],
            &[("Balme Library", -0.1983, 5.6506), ("JQB", -0.1982, 5.6531), ("Commonwealth Hall", -0.1996, 5.6558)],
        );
        graph.insert_edge(Edge::new("Balme Library", "JQB", 300.0)).unwrap();
        graph.insert_edge(Edge::new("JQB", "Commonwealth Hall", 400.0)).unwrap();
        graph.insert_edge(Edge::new("Balme Library", "Commonwealth Hall", 900.0)).unwrap();

        let a_star = AStar::new(Metric::Distance, HeuristicKind::Haversine);
        let outcome = a_star.shortest_path(&graph, "Balme Library", "Commonwealth Hall").unwrap();
        assert_eq!(outcome.nodes(), &["Balme Library", "JQB", "Commonwealth Hall"]);
        assert_eq!(outcome.cost(), Some(700.0));
    }

    #[test]
    fn test_engine_refuses_goal_without_coordinates() {
        // the cheap route S-Y-Z-G must not lose to S-X-G because G has no usable position
        let graph = campus(
            &[("S", "X", 10.0), ("X", "G", 10.0), ("S", "Y", 1.0), ("Y", "Z", 1.0), ("Z", "G", 1.0)],
            &[("S", 0.0, 0.0), ("X", 0.0, 0.0), ("Y", 0.0, 0.0), ("Z", 0.0, 0.0), ("G", f64::NAN, 0.0)],
        );

        assert!(matches!(
            AStar::default().shortest_path(&graph, "S", "G"),
            Err(NavigateError::InadmissibleHeuristic { .. })
        ));

        let zero = AStar::new(Metric::Distance, HeuristicKind::Zero);
        let outcome = zero.shortest_path(&graph, "S", "G").unwrap();
        assert_eq!(outcome.nodes(), &["S", "Y", "Z", "G"]);
        assert_eq!(outcome.cost(), Some(3.0));
    }
}
