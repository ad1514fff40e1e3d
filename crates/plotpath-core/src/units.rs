//! Document-to-device coordinate conversion.
//!
//! Input geometry arrives in document pixels (72 per inch). The device
//! works in steps, and its x axis runs opposite to the document's, so
//! x is mirrored about the media width before scaling:
//!
//! ```text
//! step_x = (media_width - pixel_x / pixels_per_inch) × steps_per_inch
//! step_y = (pixel_y / pixels_per_inch) × steps_per_inch
//! ```
//!
//! The graph, seed index, walker and sequencer never see this type;
//! they operate purely in steps.

use serde::{Deserialize, Serialize};

use crate::types::{Point, Polyline, Rect};

/// Unit conversion parameters, passed explicitly to whatever reads
/// document geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    /// Document pixels per inch.
    pub pixels_per_inch: f64,
    /// Device steps per inch.
    pub steps_per_inch: f64,
    /// Media width in inches; the mirror line for the x flip.
    pub media_width_inches: f64,
    /// Mirror x about the media width.
    pub flip_x: bool,
}

impl UnitConfig {
    /// CSS pixel density.
    pub const DEFAULT_PIXELS_PER_INCH: f64 = 72.0;
    /// 20 steps per millimetre.
    pub const DEFAULT_STEPS_PER_INCH: f64 = 508.0;
    /// 12 inch cutting mat.
    pub const DEFAULT_MEDIA_WIDTH_INCHES: f64 = 12.0;

    /// Convert one document point to device steps.
    #[must_use]
    pub fn to_steps(&self, p: Point) -> Point {
        let mut x = p.x / self.pixels_per_inch;
        let y = p.y / self.pixels_per_inch;
        if self.flip_x {
            x = self.media_width_inches - x;
        }
        Point::new(x * self.steps_per_inch, y * self.steps_per_inch)
    }

    /// Convert every point of a polyline.
    #[must_use]
    pub fn polyline_to_steps(&self, polyline: &Polyline) -> Polyline {
        polyline.points().iter().map(|&p| self.to_steps(p)).collect()
    }

    /// Convert a rectangle, keeping its start corner.
    ///
    /// Width and height become signed step extents, so the converted
    /// outline is the converted source outline point for point.
    #[must_use]
    pub fn rect_to_steps(&self, rect: &Rect) -> Rect {
        let origin = self.to_steps(rect.origin);
        let far = self.to_steps(Point::new(
            rect.origin.x + rect.width,
            rect.origin.y + rect.height,
        ));
        Rect::new(origin, far.x - origin.x, far.y - origin.y)
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            pixels_per_inch: Self::DEFAULT_PIXELS_PER_INCH,
            steps_per_inch: Self::DEFAULT_STEPS_PER_INCH,
            media_width_inches: Self::DEFAULT_MEDIA_WIDTH_INCHES,
            flip_x: true,
        }
    }
}
