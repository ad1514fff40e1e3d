//! plotpath-core: toolpath graph builder and stroke sequencer (sans-IO).
//!
//! Turns straight-line geometry in device steps into an ordered list of
//! pen-down strokes that draw every input segment exactly once:
//!
//! polylines -> visitation graph -> seed index -> component walks ->
//! strokes.
//!
//! Nothing in this crate performs I/O. Document parsing lives in
//! `plotpath-svg` and device output in `plotpath-plotter`.

pub mod graph;
pub mod seed;
pub mod sequence;
pub mod types;
pub mod units;
pub mod walk;

pub use graph::{EdgeId, NodeId, VisitationGraph};
pub use seed::{Seed, SeedIndex};
pub use sequence::{SequencerConfig, StrokeSequencer, sequence_strokes};
pub use types::{GAP_THRESHOLD, Point, Polyline, RECT_PASSES, Rect, Stroke};
pub use units::UnitConfig;
pub use walk::walk_component;
