//! Document reader: collect `<path>` and `<rect>` geometry from SVG.
//!
//! Each `<path>` element becomes one group of straight polylines and
//! each `<rect>` one rectangle descriptor, both converted to device
//! steps with the caller's [`UnitConfig`]. Transforms are not applied.

use std::path::Path;

use svg::node::Attributes;
use svg::node::element::tag;
use svg::parser::Event;

use plotpath_core::{Point, Polyline, Rect, UnitConfig};

use crate::error::SvgError;
use crate::path::trace_path_data;

/// The straight polylines of one `<path>` element.
pub type PathGeometry = Vec<Polyline>;

/// Plotter geometry read from one SVG document, in device steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// One entry per `<path>` element, in document order.
    pub paths: Vec<PathGeometry>,
    /// Every `<rect>` element, in document order.
    pub rects: Vec<Rect>,
}

impl Document {
    /// Total number of input polylines across all paths.
    #[must_use]
    pub fn polyline_count(&self) -> usize {
        self.paths.iter().map(Vec::len).sum()
    }
}

/// Parse a length attribute, accepting a trailing `px`.
fn length(
    attributes: &Attributes,
    name: &'static str,
    default: Option<f64>,
) -> Result<f64, SvgError> {
    let Some(raw) = attributes.get(name) else {
        return default.ok_or(SvgError::RectAttribute { name, value: None });
    };
    let text = raw.trim();
    let text = text.strip_suffix("px").unwrap_or(text).trim();
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SvgError::RectAttribute {
            name,
            value: Some(raw.to_string()),
        })
}

fn warn_on_transform(element: &str, attributes: &Attributes) {
    if attributes.contains_key("transform") {
        tracing::warn!(element, "ignoring transform attribute");
    }
}

/// Read plotter geometry from SVG text.
///
/// # Errors
///
/// Fails fast on malformed XML ([`SvgError::Document`]), on path data
/// that cannot be reduced to straight lines, and on rects without a
/// numeric `width`/`height`.
pub fn read_document(content: &str, units: &UnitConfig) -> Result<Document, SvgError> {
    let mut document = Document::default();

    for event in svg::read(content)? {
        match event {
            Event::Error(e) => return Err(SvgError::Document(e)),
            Event::Tag(tag::Path, tag::Type::Start | tag::Type::Empty, attributes) => {
                warn_on_transform(tag::Path, &attributes);
                let d = attributes.get("d").ok_or(SvgError::MissingPathData)?;
                let polylines = trace_path_data(d)?
                    .iter()
                    .map(|polyline| units.polyline_to_steps(polyline))
                    .collect();
                document.paths.push(polylines);
            }
            Event::Tag(tag::Rectangle, tag::Type::Start | tag::Type::Empty, attributes) => {
                warn_on_transform(tag::Rectangle, &attributes);
                let rect = Rect::new(
                    Point::new(
                        length(&attributes, "x", Some(0.0))?,
                        length(&attributes, "y", Some(0.0))?,
                    ),
                    length(&attributes, "width", None)?,
                    length(&attributes, "height", None)?,
                );
                document.rects.push(units.rect_to_steps(&rect));
            }
            _ => {}
        }
    }

    tracing::info!(
        paths = document.paths.len(),
        polylines = document.polyline_count(),
        rects = document.rects.len(),
        "read SVG document"
    );
    Ok(document)
}

/// Read plotter geometry from an SVG file.
///
/// # Errors
///
/// Returns [`SvgError::Io`] if the file cannot be read, otherwise the
/// same errors as [`read_document`].
pub fn read_file(path: impl AsRef<Path>, units: &UnitConfig) -> Result<Document, SvgError> {
    let content = std::fs::read_to_string(path)?;
    read_document(&content, units)
}
