//! Component walker: a depth-first walk that draws every edge reachable
//! from a start node through not-yet-visited edges.
//!
//! # Algorithm
//!
//! An explicit stack holds the current depth-first branch. While the top
//! of the stack still has an unvisited edge, that edge is taken (and
//! flagged visited) and its far end is pushed and written to the path.
//! When the top is exhausted it is popped and the new top is buffered as
//! a pending backtrack step.
//!
//! Buffered backtrack steps are only written out once forward progress
//! resumes, so retracing back to a branch point costs exactly the
//! segments needed to reach it, and a trailing retrace after the last
//! new edge is dropped entirely.
//!
//! Each edge flips to visited at most once and the stack never exceeds
//! the node count, so a walk is `O(V + E)` over its component (plus the
//! degree scan at each step).

use std::cmp::Ordering;

use crate::graph::{NodeId, VisitationGraph};
use crate::types::Point;

/// Canonical neighbor order: ascending by `(x, y)`.
fn canonical(a: Point, b: Point) -> Ordering {
    a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y))
}

/// Walk the component reachable from `start` over unvisited edges.
///
/// Returns the visited node sequence beginning with `start`. Every
/// consecutive pair is an edge of the graph, and every edge appears at
/// most once as a forward step. Edges taken are flagged visited on
/// `graph`, so a later walk never redraws them.
///
/// When several unvisited edges leave a node, the neighbor with the
/// smallest `(x, y)` is taken first.
#[must_use = "the walk marks edges visited; dropping the path loses them"]
pub fn walk_component(graph: &mut VisitationGraph, start: NodeId) -> Vec<NodeId> {
    let mut stack = vec![start];
    let mut path = vec![start];
    let mut backtrack: Vec<NodeId> = Vec::new();

    while let Some(&top) = stack.last() {
        let next = graph
            .unvisited_neighbors(top)
            .min_by(|(_, a), (_, b)| canonical(graph.point(*a), graph.point(*b)));

        if let Some((edge, child)) = next {
            graph.mark_visited(edge);
            path.append(&mut backtrack);
            path.push(child);
            stack.push(child);
            continue;
        }

        stack.pop();
        if let Some(&parent) = stack.last() {
            backtrack.push(parent);
        }
    }

    tracing::trace!(
        start = ?graph.point(start),
        len = path.len(),
        discarded_backtrack = backtrack.len(),
        "walked component"
    );
    path
}
