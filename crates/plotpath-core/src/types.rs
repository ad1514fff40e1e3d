//! Shared types for the plotpath toolpath core.

use serde::{Deserialize, Serialize};

/// Distance in device steps above which two consecutive component walks
/// are split into separate strokes.
pub const GAP_THRESHOLD: f64 = 16.0;

/// Number of reinforcement passes drawn for every rectangle.
pub const RECT_PASSES: usize = 3;

/// A 2D point in device step coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// An ordered run of connected input coordinates.
///
/// Consecutive points are the straight segments fed to the graph builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Iterate over consecutive point pairs (the polyline's segments).
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.0.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl FromIterator<Point> for Polyline {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One continuous pen-down path.
///
/// The first point is where the pen is lowered after a pen-up
/// repositioning move; every following point is a drawn segment end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke(Vec<Point>);

impl Stroke {
    /// Create a stroke from its ordered points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// The repositioning target, or `None` for an empty stroke.
    #[must_use]
    pub fn start(&self) -> Option<Point> {
        self.0.first().copied()
    }

    /// The last drawn point.
    #[must_use]
    pub fn end(&self) -> Option<Point> {
        self.0.last().copied()
    }

    /// Number of points in the stroke.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the stroke has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All points, starting with the repositioning target.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the stroke and returns its points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// An axis-aligned rectangle drawn independently of the graph path.
///
/// `width` and `height` may be negative after a coordinate flip; the
/// outline is still the same closed loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Start corner of the outline.
    pub origin: Point,
    /// Signed extent along x.
    pub width: f64,
    /// Signed extent along y.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle descriptor.
    #[must_use]
    pub const fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Closed 5-point outline: start corner, the three other corners,
    /// then back to the start corner.
    #[must_use]
    pub fn outline(&self) -> [Point; 5] {
        let Point { x, y } = self.origin;
        [
            self.origin,
            Point::new(x + self.width, y),
            Point::new(x + self.width, y + self.height),
            Point::new(x, y + self.height),
            self.origin,
        ]
    }
}
