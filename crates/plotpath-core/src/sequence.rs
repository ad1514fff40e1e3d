//! Stroke sequencer: stitch per-component walks into pen-down strokes.
//!
//! Starting from a fixed origin, the sequencer repeatedly picks the
//! remaining node nearest to the pen, walks its component, and appends
//! the walk to the current stroke. When the jump to the next seed is
//! longer than the gap threshold the current stroke is finished first,
//! so the pen lifts only for genuinely distant fragments.
//!
//! This is a greedy nearest-seed order, not an optimal tour.
//!
//! The sequencer owns the graph and destroys it as it goes: each walk
//! flags edges visited and culls nodes from the seed index. A stroke
//! sequence is one-shot; re-running needs a freshly built graph.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::{NodeId, VisitationGraph};
use crate::seed::{Seed, SeedIndex};
use crate::types::{GAP_THRESHOLD, Point, Polyline, Stroke};
use crate::walk::walk_component;

/// Sequencer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Jumps strictly longer than this (in steps) start a new stroke.
    pub gap_threshold: f64,
    /// Initial pen position.
    pub origin: Point,
}

impl SequencerConfig {
    /// Default gap threshold in steps.
    pub const DEFAULT_GAP_THRESHOLD: f64 = GAP_THRESHOLD;
    /// Default starting pen position.
    pub const DEFAULT_ORIGIN: Point = Point::new(0.0, 0.0);
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            gap_threshold: Self::DEFAULT_GAP_THRESHOLD,
            origin: Self::DEFAULT_ORIGIN,
        }
    }
}

/// Lazy, finite iterator of strokes over a [`VisitationGraph`].
///
/// Every edge of the graph is drawn exactly once across the yielded
/// strokes. Strokes are never empty.
#[derive(Debug)]
pub struct StrokeSequencer {
    graph: VisitationGraph,
    seeds: SeedIndex,
    culled: HashSet<NodeId>,
    cursor: Point,
    current: Vec<Point>,
    pending: Option<Seed>,
    gap_threshold: f64,
    walks: usize,
    done: bool,
}

impl StrokeSequencer {
    /// Take ownership of a fully built graph and index all its nodes.
    #[must_use]
    pub fn new(graph: VisitationGraph, config: &SequencerConfig) -> Self {
        let seeds = SeedIndex::new(&graph);
        Self {
            culled: HashSet::with_capacity(graph.node_count()),
            graph,
            seeds,
            cursor: config.origin,
            current: Vec::new(),
            pending: None,
            gap_threshold: config.gap_threshold,
            walks: 0,
            done: false,
        }
    }

    /// Current pen position.
    #[must_use]
    pub const fn cursor(&self) -> Point {
        self.cursor
    }

    /// Number of component walks run so far.
    #[must_use]
    pub const fn walks(&self) -> usize {
        self.walks
    }

    /// Nodes still available as seeds.
    #[must_use]
    pub fn seeds_remaining(&self) -> usize {
        self.seeds.len()
    }

    /// Nodes culled so far.
    #[must_use]
    pub fn culled(&self) -> usize {
        self.culled.len()
    }

    /// Give back the (partially or fully) consumed graph.
    #[must_use]
    pub fn into_graph(self) -> VisitationGraph {
        self.graph
    }

    /// Remove a node from the seed index the first time it is seen.
    fn cull(&mut self, node: NodeId, point: Point) {
        if self.culled.insert(node) {
            self.seeds.remove(node, point);
        }
    }

    fn take_stroke(&mut self) -> Stroke {
        let stroke = Stroke::new(std::mem::take(&mut self.current));
        tracing::debug!(
            points = stroke.len(),
            start = ?stroke.start(),
            "emitting stroke"
        );
        stroke
    }
}

impl Iterator for StrokeSequencer {
    type Item = Stroke;

    fn next(&mut self) -> Option<Stroke> {
        if self.done {
            return None;
        }

        loop {
            let seed = match self.pending.take() {
                Some(seed) => seed,
                None => {
                    let Some(seed) = self.seeds.nearest(self.cursor) else {
                        self.done = true;
                        tracing::debug!(walks = self.walks, "sequencer exhausted");
                        return if self.current.is_empty() {
                            None
                        } else {
                            Some(self.take_stroke())
                        };
                    };
                    self.cull(seed.node, seed.point);
                    if !self.current.is_empty() && seed.distance() > self.gap_threshold {
                        // Walk this seed on the next call, after the
                        // finished stroke has been handed out.
                        self.pending = Some(seed);
                        return Some(self.take_stroke());
                    }
                    seed
                }
            };

            tracing::debug!(
                seed = ?seed.point,
                distance = seed.distance(),
                "seeding walk"
            );
            let walk = walk_component(&mut self.graph, seed.node);
            self.walks += 1;
            for node in walk {
                let point = self.graph.point(node);
                self.cull(node, point);
                self.current.push(point);
            }
            if let Some(&last) = self.current.last() {
                self.cursor = last;
            }
        }
    }
}

/// Build a graph from polylines and sequence it.
#[must_use]
pub fn sequence_strokes(polylines: &[Polyline], config: &SequencerConfig) -> StrokeSequencer {
    StrokeSequencer::new(VisitationGraph::from_polylines(polylines), config)
}
