//! Line-oriented command script output.
//!
//! The script opens with the device settings, then one line per
//! command:
//!
//! ```text
//! speed 8
//! pressure 4
//! media 113
//! offset 0
//! move 0.00,0.00
//! draw 0.00,0.00 10.00,0.00
//! home
//! ```

use std::io::Write;

use plotpath_core::Point;

use crate::plotter::{Plotter, PlotterError, PlotterSettings};

/// Writes plotter commands as text to any writer.
#[derive(Debug)]
pub struct ScriptPlotter<W: Write> {
    out: W,
    settings: PlotterSettings,
    position: Option<Point>,
}

impl<W: Write> ScriptPlotter<W> {
    /// Write the settings header and return a ready plotter.
    ///
    /// # Errors
    ///
    /// Returns [`PlotterError::Io`] if the header cannot be written.
    pub fn new(mut out: W, settings: PlotterSettings) -> Result<Self, PlotterError> {
        writeln!(out, "speed {}", settings.speed)?;
        writeln!(out, "pressure {}", settings.pressure)?;
        writeln!(out, "media {}", settings.media)?;
        writeln!(out, "offset {}", settings.offset)?;
        tracing::debug!(?settings, "plotter configured");
        Ok(Self {
            out,
            settings,
            position: None,
        })
    }

    /// Settings written in the header.
    #[must_use]
    pub const fn settings(&self) -> &PlotterSettings {
        &self.settings
    }

    /// Flush and hand back the writer.
    ///
    /// # Errors
    ///
    /// Returns [`PlotterError::Io`] if flushing fails.
    pub fn finish(mut self) -> Result<W, PlotterError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> Plotter for ScriptPlotter<W> {
    fn set_position(&mut self, at: Point) -> Result<(), PlotterError> {
        if self.position == Some(at) {
            return Ok(());
        }
        writeln!(self.out, "move {:.2},{:.2}", at.x, at.y)?;
        self.position = Some(at);
        Ok(())
    }

    fn draw(&mut self, path: &[Point]) -> Result<(), PlotterError> {
        let Some(&last) = path.last() else {
            return Err(PlotterError::EmptyPath);
        };
        write!(self.out, "draw")?;
        for p in path {
            write!(self.out, " {:.2},{:.2}", p.x, p.y)?;
        }
        writeln!(self.out)?;
        self.position = Some(last);
        Ok(())
    }

    fn home(&mut self) -> Result<(), PlotterError> {
        writeln!(self.out, "home")?;
        self.position = None;
        self.out.flush()?;
        Ok(())
    }
}
