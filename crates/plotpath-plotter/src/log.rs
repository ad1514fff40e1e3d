//! In-memory plotter that records every call.
//!
//! Used for dry runs and for checking exactly what the pipeline asked
//! the device to do. A failure can be injected on the n-th draw to
//! exercise the error path.

use plotpath_core::Point;

use crate::plotter::{Plotter, PlotterError};

/// A recorded plotter call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Pen-up move.
    Move(Point),
    /// Pen-down path.
    Draw(Vec<Point>),
    /// Return home.
    Home,
}

/// Records calls instead of driving hardware.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    commands: Vec<Command>,
    draws: usize,
    fail_on_draw: Option<usize>,
}

impl CommandLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th draw call (1-based) fail with
    /// [`PlotterError::Rejected`]. Earlier draws are recorded normally.
    #[must_use]
    pub const fn failing_on_draw(mut self, n: usize) -> Self {
        self.fail_on_draw = Some(n);
        self
    }

    /// Every recorded call in order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Only the draw calls, in order.
    pub fn draws(&self) -> impl Iterator<Item = &[Point]> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw(path) => Some(path.as_slice()),
            _ => None,
        })
    }

    /// Whether the last recorded call was [`Command::Home`].
    #[must_use]
    pub fn ended_home(&self) -> bool {
        matches!(self.commands.last(), Some(Command::Home))
    }
}

impl Plotter for CommandLog {
    fn set_position(&mut self, at: Point) -> Result<(), PlotterError> {
        self.commands.push(Command::Move(at));
        Ok(())
    }

    fn draw(&mut self, path: &[Point]) -> Result<(), PlotterError> {
        if path.is_empty() {
            return Err(PlotterError::EmptyPath);
        }
        self.draws += 1;
        if self.fail_on_draw == Some(self.draws) {
            return Err(PlotterError::Rejected(format!("draw #{} refused", self.draws)));
        }
        self.commands.push(Command::Draw(path.to_vec()));
        Ok(())
    }

    fn home(&mut self) -> Result<(), PlotterError> {
        self.commands.push(Command::Home);
        Ok(())
    }
}
