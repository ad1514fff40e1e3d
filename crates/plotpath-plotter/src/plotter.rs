//! The plotter driver boundary.
//!
//! A [`Plotter`] knows three things: lift the pen and move, draw a
//! pen-down path, and go home. Device configuration is fixed once when
//! a plotter is constructed and never touched by the pipeline.

use serde::{Deserialize, Serialize};

use plotpath_core::Point;

/// Errors raised by a plotter or while draining the job queue.
#[derive(Debug, thiserror::Error)]
pub enum PlotterError {
    /// Writing to the device or output file failed.
    #[error("plotter I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The device refused a command.
    #[error("plotter rejected command: {0}")]
    Rejected(String),

    /// A draw was requested with no points.
    #[error("draw called with an empty path")]
    EmptyPath,

    /// The job channel closed without an end-of-stream marker.
    #[error("stroke producer stopped before end of stream")]
    ProducerGone,

    /// The stroke producer thread panicked.
    #[error("stroke producer panicked")]
    ProducerPanicked,
}

/// A pen plotter or cutter that can be driven stroke by stroke.
pub trait Plotter {
    /// Lift the pen and move to `at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot execute the move.
    fn set_position(&mut self, at: Point) -> Result<(), PlotterError>;

    /// Lower the pen and draw through `path` in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot execute the draw.
    fn draw(&mut self, path: &[Point]) -> Result<(), PlotterError>;

    /// Return the tool head to its home position.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot execute the command.
    fn home(&mut self) -> Result<(), PlotterError>;
}

/// One-time device configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotterSettings {
    /// Tool speed (device scale).
    pub speed: u8,
    /// Blade or pen pressure (device scale).
    pub pressure: u8,
    /// Media type code.
    pub media: u8,
    /// Blade offset.
    pub offset: i16,
}

impl PlotterSettings {
    /// Default tool speed.
    pub const DEFAULT_SPEED: u8 = 8;
    /// Default pressure.
    pub const DEFAULT_PRESSURE: u8 = 4;
    /// Default media code (custom media).
    pub const DEFAULT_MEDIA: u8 = 113;
    /// Default blade offset.
    pub const DEFAULT_OFFSET: i16 = 0;
}

impl Default for PlotterSettings {
    fn default() -> Self {
        Self {
            speed: Self::DEFAULT_SPEED,
            pressure: Self::DEFAULT_PRESSURE,
            media: Self::DEFAULT_MEDIA,
            offset: Self::DEFAULT_OFFSET,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let s = PlotterSettings::default();
        assert_eq!((s.speed, s.pressure, s.media, s.offset), (8, 4, 113, 0));
    }

    #[test]
    fn settings_partial_json_fills_defaults() {
        let s: PlotterSettings = serde_json::from_str(r#"{"pressure": 20}"#).unwrap();
        assert_eq!(s.pressure, 20);
        assert_eq!(s.speed, PlotterSettings::DEFAULT_SPEED);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            PlotterError::ProducerGone.to_string(),
            "stroke producer stopped before end of stream"
        );
        assert_eq!(
            PlotterError::Rejected("jammed".to_string()).to_string(),
            "plotter rejected command: jammed"
        );
    }
}
