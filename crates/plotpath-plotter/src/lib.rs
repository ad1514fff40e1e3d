//! plotpath-plotter: drive a pen plotter from sequenced strokes.
//!
//! [`Plotter`] is the device boundary. [`run`] sequences a document on
//! a producer thread and drains the resulting [`Job`]s into a plotter
//! on the caller's thread, homing the device however the run ends.

pub mod log;
pub mod pipeline;
pub mod plotter;
pub mod script;

pub use log::{Command, CommandLog};
pub use pipeline::{Job, PlotSummary, consume, produce, run};
pub use plotter::{Plotter, PlotterError, PlotterSettings};
pub use script::ScriptPlotter;
