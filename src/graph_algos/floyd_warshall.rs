use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};

use crate::collections::FxIndexSet;
use crate::errors::{NavigateError, Result};
use crate::graph::{Graph, Metric};
use super::{PathOutcome, PathResult, ShortestPathEngine};


/// Width of one column when rendering the distance matrix
const COLUMN_WIDTH: usize = 15;
/// Labels longer than this are cut in the rendered matrix
const LABEL_WIDTH: usize = 12;


/// All-pairs shortest paths via Floyd-Warshall
/// https://en.wikipedia.org/wiki/Floyd%E2%80%93Warshall_algorithm
///
/// Matrices are indexed by the graph's node insertion order. Unreachable pairs hold
/// `f64::INFINITY` in `dist` and `None` in `next`.
#[derive(Clone, Debug)]
pub struct AllPairs {
    ids: FxIndexSet<String>, // index -> node id
    names: Vec<String>, // index -> display name
    dist: Vec<Vec<f64>>,
    next: Vec<Vec<Option<usize>>>, // next hop on the shortest i -> j path
}

impl AllPairs {

    /// Build both matrices for `graph` under `metric`
    pub fn compute(graph: &Graph, metric: Metric) -> Self {
        let ids: FxIndexSet<String> = graph.nodes().map(|node| node.id().to_string()).collect();
        let names: Vec<String> = graph.nodes().map(|node| node.name().to_string()).collect();
        let n = ids.len();

        let mut dist = vec![vec![f64::INFINITY; n]; n];
        let mut next = vec![vec![None; n]; n];

        for (i, row) in dist.iter_mut().enumerate() {
            row[i] = 0.0;
        }

        // Direct edges, keeping the cheapest when a pair is connected twice
        for edge in graph.edges() {
            let Some(weight) = edge.cost(metric) else {
                continue;
            };
            let (Some(i), Some(j)) = (ids.get_index_of(&edge.source), ids.get_index_of(&edge.target)) else {
                continue;
            };
            if i == j || weight >= dist[i][j] {
                continue;
            }

            dist[i][j] = weight;
            dist[j][i] = weight;
            next[i][j] = Some(j);
            next[j][i] = Some(i);
        }

        // k must stay the outermost loop
        for k in 0..n {
            for i in 0..n {
                let through_k = dist[i][k];
                if through_k.is_infinite() {
                    continue;
                }
                for j in 0..n {
                    let candidate = through_k + dist[k][j];
                    if candidate < dist[i][j] {
                        dist[i][j] = candidate;
                        next[i][j] = next[i][k];
                    }
                }
            }
            trace!("floyd-warshall: {}/{} intermediate locations done", k + 1, n);
        }
        debug!("floyd-warshall computed {n}x{n} distance matrix");

        Self { ids, names, dist, next }
    }

    /// Node ids in matrix order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Matrix index of an id, falling back to an exact name match
    fn index(&self, key: &str) -> Result<usize> {
        self.ids
            .get_index_of(key)
            .or_else(|| self.names.iter().position(|name| name == key))
            .ok_or_else(|| NavigateError::UnknownLocation(key.to_string()))
    }

    fn id(&self, index: usize) -> &str {
        self.ids.get_index(index).map(String::as_str).unwrap_or_default()
    }

    /// Shortest distance between two locations, None when unreachable
    pub fn distance(&self, from: &str, to: &str) -> Result<Option<f64>> {
        let (i, j) = (self.index(from)?, self.index(to)?);
        let d = self.dist[i][j];
        Ok(d.is_finite().then_some(d))
    }

    /// Shortest route between two locations
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<PathOutcome> {
        let (i, j) = (self.index(from)?, self.index(to)?);
        Ok(match self.walk(i, j) {
            Some(indices) => PathOutcome::Found(self.to_result(&indices, self.dist[i][j])),
            None => PathOutcome::NotFound,
        })
    }

    /// Follow next hops from `from` until `to`
    fn walk(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let mut path = vec![from];
        let mut current = from;

        while current != to {
            current = self.next[current][to]?;
            path.push(current);

            // a well formed next matrix never needs more than n hops
            if path.len() > self.len() {
                return None;
            }
        }

        Some(path)
    }

    fn to_result(&self, indices: &[usize], cost: f64) -> PathResult {
        PathResult::new(indices.iter().map(|&i| self.id(i).to_string()).collect(), cost)
    }

    /// Every other reachable location whose shortest distance from `source` is at most `threshold`
    /// Sorted nearest first, equal distances in matrix order
    pub fn within_radius(&self, source: &str, threshold: f64) -> Result<Vec<(String, f64)>> {
        if !(threshold >= 0.0) {
            return Err(NavigateError::InvalidThreshold(threshold));
        }
        let s = self.index(source)?;

        let mut reachable: Vec<(usize, f64)> = self.dist[s]
            .iter()
            .enumerate()
            .filter(|&(i, &d)| i != s && d.is_finite() && d <= threshold)
            .map(|(i, &d)| (i, d))
            .collect();
        reachable.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

        Ok(reachable.into_iter().map(|(i, d)| (self.id(i).to_string(), d)).collect())
    }

    /// Route from `from` to `to` that passes every landmark
    ///
    /// Landmarks are visited greedily: from the current position the nearest unvisited
    /// landmark is taken next (ties go to the earlier landmark in `landmarks`). This is a
    /// nearest-neighbour tour and is not guaranteed to be the shortest visiting order.
    /// Legs are joined without repeating their shared endpoint. If any landmark or the
    /// destination cannot be reached the whole route is `NotFound`.
    pub fn route_via_landmarks<S: AsRef<str>>(&self, from: &str, to: &str, landmarks: &[S]) -> Result<PathOutcome> {
        let start = self.index(from)?;
        let goal = self.index(to)?;

        // Resolve up front so an unknown landmark fails before any routing
        let mut remaining: FxIndexSet<usize> = FxIndexSet::default();
        for landmark in landmarks {
            remaining.insert(self.index(landmark.as_ref())?);
        }

        let mut route = vec![start];
        let mut total = 0.0;
        let mut current = start;

        while !remaining.is_empty() {
            let nearest = remaining
                .iter()
                .copied()
                .filter(|&l| self.dist[current][l].is_finite())
                .min_by(|&a, &b| {
                    self.dist[current][a].partial_cmp(&self.dist[current][b]).unwrap_or(Ordering::Equal)
                });

            let Some(nearest) = nearest else {
                debug!("no remaining landmark reachable from {}", self.id(current));
                return Ok(PathOutcome::NotFound);
            };

            if !self.append_leg(&mut route, &mut total, current, nearest) {
                return Ok(PathOutcome::NotFound);
            }
            current = nearest;
            remaining.shift_remove(&nearest);
        }

        if !self.append_leg(&mut route, &mut total, current, goal) {
            return Ok(PathOutcome::NotFound);
        }

        Ok(PathOutcome::Found(self.to_result(&route, total)))
    }

    /// Append the shortest `from` -> `to` leg to `route`, dropping its first node
    fn append_leg(&self, route: &mut Vec<usize>, total: &mut f64, from: usize, to: usize) -> bool {
        match self.walk(from, to) {
            Some(leg) => {
                route.extend_from_slice(&leg[1..]);
                *total += self.dist[from][to];
                true
            }
            None => false,
        }
    }
}

/// Render the distance matrix, `∞` for unreachable pairs
impl fmt::Display for AllPairs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |name: &str| name.chars().take(LABEL_WIDTH).collect::<String>();

        write!(f, "{:>w$}", "", w = COLUMN_WIDTH)?;
        for name in &self.names {
            write!(f, "{:>w$}", label(name), w = COLUMN_WIDTH)?;
        }
        writeln!(f)?;

        for (name, row) in self.names.iter().zip(&self.dist) {
            write!(f, "{:>w$}", label(name), w = COLUMN_WIDTH)?;
            for d in row {
                if d.is_finite() {
                    write!(f, "{:>w$.0}", d, w = COLUMN_WIDTH)?;
                } else {
                    write!(f, "{:>w$}", "∞", w = COLUMN_WIDTH)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}


/// Engine wrapper: computes the matrices for every query
/// Keep an `AllPairs` around instead when asking many questions of one graph
#[derive(Clone, Copy, Debug, Default)]
pub struct FloydWarshall {
    pub metric: Metric,
}

impl FloydWarshall {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }
}

impl ShortestPathEngine for FloydWarshall {

    fn name(&self) -> &'static str {
        "floyd_warshall"
    }

    fn shortest_path(&self, graph: &Graph, start: &str, goal: &str) -> Result<PathOutcome> {
        // Fail on unknown keys before paying for the matrices
        let start = graph.resolve(start)?.id();
        let goal = graph.resolve(goal)?.id();

        AllPairs::compute(graph, self.metric).shortest_path(start, goal)
    }
}
