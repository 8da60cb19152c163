//! Campus route planning over a small weighted location graph.
//!
//! A `Graph` is built once from an injected `GraphSource`, then queried with any of
//! three interchangeable engines: `AStar`, `Dijkstra` and `FloydWarshall` (with
//! `AllPairs` for radius and multi-landmark queries). All of them report an
//! unreachable goal as `PathOutcome::NotFound` and an unknown location as
//! `NavigateError::UnknownLocation`.

pub mod config;
pub mod errors;
pub mod geometry;
pub mod graph;
pub mod graph_algos;
pub mod navigator;
mod collections;

pub use config::{Algorithm, NavigatorConfig};
pub use errors::{NavigateError, Result};
pub use graph::{BuildReport, Edge, Graph, GraphSource, JsonSource, Metric, Node, StaticSource};
pub use graph_algos::a_star::AStar;
pub use graph_algos::dijkstra::Dijkstra;
pub use graph_algos::floyd_warshall::{AllPairs, FloydWarshall};
pub use graph_algos::heuristic::HeuristicKind;
pub use graph_algos::{PathOutcome, PathResult, ShortestPathEngine};
pub use navigator::Navigator;
