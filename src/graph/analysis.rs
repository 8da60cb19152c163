//! Read-only summaries of a campus graph: search, degree statistics,
//! connectivity and spatial lookups.

use std::cmp::Ordering;
use std::f64::consts::{FRAC_PI_2, PI};

use kdtree::KdTree;

use crate::collections::{FxIndexMap, FxIndexSet};
use crate::errors::{NavigateError, Result};
use crate::geometry::{EARTH_RADIUS_METERS, euclidean, haversine, squared_euclidean};
use super::{Edge, Graph, Node};


/// Great-circle metres per degree of latitude
const METRES_PER_DEGREE: f64 = EARTH_RADIUS_METERS * PI / 180.0;


impl Graph {

    /// Nodes whose name contains `term`, case-insensitive
    pub fn search_by_name(&self, term: &str) -> Vec<&Node> {
        let term = term.to_lowercase();
        self.nodes()
            .filter(|node| node.name().to_lowercase().contains(&term))
            .collect()
    }

    /// Nodes in a category, case-insensitive
    pub fn nodes_in_category(&self, category: &str) -> Vec<&Node> {
        self.nodes()
            .filter(|node| node.category().is_some_and(|c| c.eq_ignore_ascii_case(category)))
            .collect()
    }

    /// Distinct node categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let categories: FxIndexSet<&str> = self.nodes().filter_map(Node::category).collect();
        categories.into_iter().collect()
    }

    /// Number of connections per node, insertion order
    pub fn degrees(&self) -> Vec<(&str, usize)> {
        self.nodes()
            .map(|node| (node.id(), self.neighbors(node.id()).len()))
            .collect()
    }

    /// The `limit` nodes with the most connections
    /// Equal degrees keep insertion order
    pub fn most_connected(&self, limit: usize) -> Vec<&Node> {
        let mut degrees: Vec<(usize, &Node)> = self.nodes()
            .map(|node| (self.neighbors(node.id()).len(), node))
            .collect();
        degrees.sort_by(|a, b| b.0.cmp(&a.0)); // stable

        degrees.into_iter().take(limit).map(|(_, node)| node).collect()
    }

    /// Nodes without any connection
    pub fn orphaned_nodes(&self) -> Vec<&Node> {
        self.nodes()
            .filter(|node| self.neighbors(node.id()).is_empty())
            .collect()
    }

    /// Groups of mutually reachable nodes
    /// Components are listed by their first node in insertion order
    pub fn connected_components(&self) -> Vec<Vec<&str>> {
        let mut visited: FxIndexSet<&str> = FxIndexSet::default();
        let mut components = Vec::new();

        for node in self.nodes() {
            if visited.contains(node.id()) {
                continue;
            }

            // iterative depth first search
            let mut component = Vec::new();
            let mut stack = vec![node.id()];
            visited.insert(node.id());

            while let Some(current) = stack.pop() {
                component.push(current);
                for edge in self.neighbors(current) {
                    if let Some(target) = self.node(&edge.target) {
                        if visited.insert(target.id()) {
                            stack.push(target.id());
                        }
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Number of nodes per category in first-seen order, uncategorised nodes under "uncategorized"
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: FxIndexMap<&str, usize> = FxIndexMap::default();
        for node in self.nodes() {
            *counts.entry(node.category().unwrap_or("uncategorized")).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Edges grouped by path category, uncategorised edges under "uncategorized"
    pub fn edges_by_category(&self) -> Vec<(&str, Vec<&Edge>)> {
        let mut groups: FxIndexMap<&str, Vec<&Edge>> = FxIndexMap::default();
        for edge in self.edges() {
            let key = edge.category.as_deref().unwrap_or("uncategorized");
            groups.entry(key).or_default().push(edge);
        }
        groups.into_iter().collect()
    }

    /// Sum of primary weights over all undirected edges
    pub fn total_distance(&self) -> f64 {
        self.edges().map(|edge| edge.weight).sum()
    }

    pub fn average_edge_length(&self) -> Option<f64> {
        if self.edge_count() == 0 {
            return None;
        }
        Some(self.total_distance() / self.edge_count() as f64)
    }

    pub fn longest_edge(&self) -> Option<&Edge> {
        self.edges().max_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal))
    }

    pub fn shortest_edge(&self) -> Option<&Edge> {
        self.edges().min_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(Ordering::Equal))
    }

    /// Nodes within `radius` coordinate units of (x, y), nearest first
    pub fn nodes_near(&self, x: f64, y: f64, radius: f64) -> Result<Vec<(&Node, f64)>> {
        if !(radius >= 0.0) {
            return Err(NavigateError::InvalidThreshold(radius));
        }

        let candidates = self.spatial_candidates(x, y, Some(radius))?;
        Ok(self.rank_within(candidates, radius, |node| euclidean(x, y, node.x(), node.y())))
    }

    /// Nodes within `radius_metres` of (longitude, latitude), nearest first
    /// Coordinates are read as x = longitude, y = latitude in degrees and distances
    /// are great-circle metres.
    pub fn nodes_near_metres(&self, longitude: f64, latitude: f64, radius_metres: f64) -> Result<Vec<(&Node, f64)>> {
        if !(radius_metres >= 0.0) {
            return Err(NavigateError::InvalidThreshold(radius_metres));
        }

        let bound = degree_bound(longitude, latitude, radius_metres);
        let candidates = self.spatial_candidates(longitude, latitude, bound)?;
        Ok(self.rank_within(candidates, radius_metres, |node| haversine(longitude, latitude, node.x(), node.y())))
    }

    /// Node indices whose planar distance to (x, y) is at most `radius`, every node for None
    fn spatial_candidates(&self, x: f64, y: f64, radius: Option<f64>) -> Result<Vec<usize>> {
        let Some(radius) = radius else {
            return Ok((0..self.node_count()).collect());
        };
        if self.is_empty() {
            return Ok(Vec::new());
        }

        // point -> index in insertion order
        let mut tree: KdTree<f64, usize, [f64; 2]> = KdTree::new(2);
        for (index, node) in self.nodes().enumerate() {
            tree.add([node.x(), node.y()], index)?;
        }

        // the tree compares squared distances
        let found = tree.within(&[x, y], radius.powi(2), &|a: &[f64], b: &[f64]| {
            squared_euclidean(a[0], a[1], b[0], b[1])
        })?;

        Ok(found.into_iter().map(|(_, &index)| index).collect())
    }

    /// Measure each candidate, keep those within `radius`, nearest first then insertion order
    fn rank_within<F>(&self, candidates: Vec<usize>, radius: f64, measure: F) -> Vec<(&Node, f64)>
    where
        F: Fn(&Node) -> f64,
    {
        let mut near: Vec<(usize, &Node, f64)> = candidates
            .into_iter()
            .filter_map(|index| self.nodes.get_index(index).map(|(_, node)| (index, node)))
            .map(|(index, node)| (index, node, measure(node)))
            .filter(|&(_, _, distance)| distance <= radius)
            .collect();
        near.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

        near.into_iter().map(|(_, node, distance)| (node, distance)).collect()
    }
}


/// Planar radius in degrees that contains every point within `radius_metres` of
/// (longitude, latitude); None when the circle reaches a pole or the antimeridian.
///
/// Latitude spans at most r / (metres per degree). A longitude gap Δλ between points
/// no further than φ from the equator costs at least R·cos(φ)·(2/π)·Δλ metres, hence
/// the π/2 slack on the longitude span.
fn degree_bound(longitude: f64, latitude: f64, radius_metres: f64) -> Option<f64> {
    let lat_span = radius_metres / METRES_PER_DEGREE;
    let max_latitude = latitude.abs() + lat_span;
    if !(max_latitude < 90.0) {
        return None;
    }

    let lon_span = FRAC_PI_2 * lat_span / max_latitude.to_radians().cos();
    if !(longitude.abs() + lon_span < 180.0) {
        return None;
    }

    Some(lat_span.hypot(lon_span))
}
