//! plotpath-svg: read straight-line plotter geometry from SVG.
//!
//! Reduces `<path>` data to polylines and `<rect>` elements to
//! rectangle descriptors, converted to device steps. Curves and arcs
//! are rejected with a descriptive error instead of being approximated.

pub mod document;
pub mod error;
pub mod path;

pub use document::{Document, PathGeometry, read_document, read_file};
pub use error::SvgError;
pub use path::trace_path_data;
