//! Spatial seed index: nearest remaining node to the pen.
//!
//! Wraps an R\*-tree of graph nodes that have not been culled yet. The
//! sequencer asks it for the closest node to the cursor and removes
//! every node it seeds from or walks through.

use rstar::primitives::GeomWithData;
use rstar::{PointDistance, RTree};

use crate::graph::{NodeId, VisitationGraph};
use crate::types::Point;

/// An R-tree entry: a node's coordinate tagged with its id.
type SeedEntry = GeomWithData<[f64; 2], NodeId>;

/// Result of a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    /// The closest remaining node.
    pub node: NodeId,
    /// Its coordinate.
    pub point: Point,
    /// Squared Euclidean distance from the query point.
    pub distance_squared: f64,
}

impl Seed {
    /// Linear distance from the query point.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance_squared.sqrt()
    }
}

/// Mutable nearest-neighbor index over not-yet-culled nodes.
#[derive(Debug, Clone)]
pub struct SeedIndex {
    tree: RTree<SeedEntry>,
}

impl SeedIndex {
    /// Index every node of a fully built graph.
    #[must_use]
    pub fn new(graph: &VisitationGraph) -> Self {
        let entries: Vec<SeedEntry> = graph
            .nodes()
            .map(|(node, p)| GeomWithData::new([p.x, p.y], node))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// The closest remaining node to `query`, or `None` once empty.
    #[must_use]
    pub fn nearest(&self, query: Point) -> Option<Seed> {
        let q = [query.x, query.y];
        self.tree.nearest_neighbor(&q).map(|entry| {
            let [x, y] = *entry.geom();
            Seed {
                node: entry.data,
                point: Point::new(x, y),
                distance_squared: entry.distance_2(&q),
            }
        })
    }

    /// Remove a node. Removing an absent node is a no-op.
    ///
    /// Returns `true` if the node was present.
    pub fn remove(&mut self, node: NodeId, point: Point) -> bool {
        self.tree
            .remove(&GeomWithData::new([point.x, point.y], node))
            .is_some()
    }

    /// Number of remaining nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` when every node has been culled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
