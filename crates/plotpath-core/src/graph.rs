//! Visitation graph: an undirected multigraph over exact coordinates
//! with a per-edge `visited` flag.
//!
//! Nodes live in a [`petgraph`] index arena and are addressed by
//! [`NodeId`]. A side map from coordinate bits to node id gives the
//! exact-equality deduplication the builder needs.
//!
//! # Invariants
//!
//! - At most one node per distinct coordinate (`-0.0 == 0.0`).
//! - Every edge's endpoints are nodes of this graph.
//! - After construction only `visited` flags change; no node or edge is
//!   ever added by the walker or sequencer.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::types::{Point, Polyline};

/// Identity of a node in a [`VisitationGraph`].
pub type NodeId = NodeIndex;

/// Identity of an edge in a [`VisitationGraph`].
pub type EdgeId = EdgeIndex;

/// Per-edge mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeState {
    /// Whether a walk has already drawn this edge.
    pub visited: bool,
}

/// Exact-equality key for a coordinate.
///
/// Adding `0.0` folds `-0.0` into `0.0` so the key agrees with `==`.
fn coord_key(p: Point) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// Undirected graph of input segments, consumed edge by edge.
#[derive(Debug, Clone, Default)]
pub struct VisitationGraph {
    graph: UnGraph<Point, EdgeState>,
    lookup: HashMap<(u64, u64), NodeId>,
}

impl VisitationGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from polylines.
    ///
    /// Every distinct coordinate becomes one node and every consecutive
    /// pair becomes an edge with `visited = false`. Single-point
    /// polylines contribute a node with no edges. No self-loop or
    /// duplicate filtering is done.
    #[must_use]
    pub fn from_polylines(polylines: &[Polyline]) -> Self {
        let mut graph = Self::new();
        for polyline in polylines {
            let mut last = None;
            for &p in polyline.points() {
                let node = graph.insert_node(p);
                if let Some(prev) = last {
                    graph.connect(prev, node);
                }
                last = Some(node);
            }
        }
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built visitation graph"
        );
        graph
    }

    /// Insert a node for `p`, or return the existing one.
    pub fn insert_node(&mut self, p: Point) -> NodeId {
        *self
            .lookup
            .entry(coord_key(p))
            .or_insert_with(|| self.graph.add_node(p))
    }

    /// Create the edge `a`–`b`, or overwrite it if it already exists.
    ///
    /// Overwriting resets `visited` to `false`, so a segment repeated in
    /// the input can be drawn again after it was already consumed.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> EdgeId {
        self.graph.update_edge(a, b, EdgeState::default())
    }

    /// Look up the node at exactly `p`.
    #[must_use]
    pub fn find_node(&self, p: Point) -> Option<NodeId> {
        self.lookup.get(&coord_key(p)).copied()
    }

    /// Coordinate of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` does not belong to this graph.
    #[must_use]
    pub fn point(&self, node: NodeId) -> Point {
        self.graph[node]
    }

    /// Number of distinct coordinates.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All node ids with their coordinates.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.graph
            .node_indices()
            .map(move |node| (node, self.graph[node]))
    }

    /// Unvisited edges incident to `node`, paired with the node at the
    /// other end. A self-loop yields `node` itself as the neighbor.
    pub fn unvisited_neighbors(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.graph
            .edges(node)
            .filter(|edge| !edge.weight().visited)
            .map(move |edge| {
                let other = if edge.source() == node {
                    edge.target()
                } else {
                    edge.source()
                };
                (edge.id(), other)
            })
    }

    /// Flag an edge as drawn.
    pub fn mark_visited(&mut self, edge: EdgeId) {
        if let Some(state) = self.graph.edge_weight_mut(edge) {
            state.visited = true;
        }
    }

    /// Whether the edge between `a` and `b` exists and has been drawn.
    #[must_use]
    pub fn is_visited(&self, a: Point, b: Point) -> Option<bool> {
        let a = self.find_node(a)?;
        let b = self.find_node(b)?;
        let edge = self.graph.find_edge(a, b)?;
        Some(self.graph[edge].visited)
    }

    /// Number of edges not yet drawn.
    #[must_use]
    pub fn unvisited_edge_count(&self) -> usize {
        self.graph
            .edge_weights()
            .filter(|state| !state.visited)
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> Polyline {
        points.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = VisitationGraph::from_polylines(&[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn shared_endpoints_become_one_node() {
        let graph = VisitationGraph::from_polylines(&[
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.0, 0.0), (1.0, 1.0)]),
        ]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn negative_zero_matches_zero() {
        let mut graph = VisitationGraph::new();
        let a = graph.insert_node(Point::new(0.0, 0.0));
        let b = graph.insert_node(Point::new(-0.0, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn nearly_equal_points_stay_distinct() {
        let graph = VisitationGraph::from_polylines(&[
            line(&[(0.0, 0.0), (0.1 + 0.2, 0.0)]),
            line(&[(0.3, 0.0), (1.0, 0.0)]),
        ]);
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn reversed_duplicate_collapses_onto_one_edge() {
        let graph = VisitationGraph::from_polylines(&[
            line(&[(0.0, 0.0), (5.0, 0.0)]),
            line(&[(5.0, 0.0), (0.0, 0.0)]),
        ]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn reinsertion_resets_visited() {
        let mut graph = VisitationGraph::from_polylines(&[line(&[(0.0, 0.0), (5.0, 0.0)])]);
        let a = graph.find_node(Point::new(0.0, 0.0)).unwrap();
        let b = graph.find_node(Point::new(5.0, 0.0)).unwrap();
        let (edge, _) = graph.unvisited_neighbors(a).next().unwrap();
        graph.mark_visited(edge);
        assert_eq!(
            graph.is_visited(Point::new(0.0, 0.0), Point::new(5.0, 0.0)),
            Some(true)
        );

        graph.connect(b, a);
        assert_eq!(
            graph.is_visited(Point::new(0.0, 0.0), Point::new(5.0, 0.0)),
            Some(false)
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unvisited_neighbors_reports_other_endpoint() {
        let graph = VisitationGraph::from_polylines(&[line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])]);
        let middle = graph.find_node(Point::new(1.0, 0.0)).unwrap();
        let mut neighbors: Vec<Point> = graph
            .unvisited_neighbors(middle)
            .map(|(_, n)| graph.point(n))
            .collect();
        neighbors.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(neighbors, vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);
    }

    #[test]
    fn self_loop_is_kept() {
        let graph = VisitationGraph::from_polylines(&[line(&[(3.0, 3.0), (3.0, 3.0)])]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 1);
        let node = graph.find_node(Point::new(3.0, 3.0)).unwrap();
        assert!(graph.unvisited_neighbors(node).all(|(_, n)| n == node));
    }

    #[test]
    fn single_point_polyline_adds_isolated_node() {
        let graph = VisitationGraph::from_polylines(&[line(&[(7.0, 7.0)])]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
