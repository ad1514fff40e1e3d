//! Errors raised while reading plotter geometry from SVG.

/// Errors that can occur while reading an SVG document.
#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    /// The document could not be read from disk.
    #[error("failed to read SVG file: {0}")]
    Io(#[from] std::io::Error),

    /// The XML structure of the document is malformed.
    #[error("failed to parse SVG document: {0}")]
    Document(#[source] svg::parser::Error),

    /// A `d` attribute could not be parsed.
    #[error("invalid path data: {0}")]
    PathData(#[source] svg::parser::Error),

    /// A path command carried the wrong number of parameters.
    #[error("path command {command} has {count} parameters, expected coordinate pairs")]
    PathParameters {
        /// The offending command letter.
        command: char,
        /// How many numbers it carried.
        count: usize,
    },

    /// A path number overflows or is not a finite value.
    #[error("path number `{0}` is not a finite coordinate")]
    PathNumber(String),

    /// The full-precision re-read of a `d` attribute disagreed with the
    /// parsed command structure.
    #[error("path data has {found} numbers where {expected} were parsed")]
    PathNumberCount {
        /// Numbers the command structure calls for.
        expected: usize,
        /// Numbers found in the attribute text.
        found: usize,
    },

    /// The path uses a primitive that is not a straight line.
    #[error("path contains a {0} segment; only straight lines can be plotted")]
    UnsupportedSegment(&'static str),

    /// A `<path>` element has no `d` attribute.
    #[error("path element has no `d` attribute")]
    MissingPathData,

    /// A `<rect>` geometry attribute is missing or not a number.
    #[error("rect attribute `{name}` is missing or invalid: {value:?}")]
    RectAttribute {
        /// Attribute name.
        name: &'static str,
        /// Raw attribute value, if present.
        value: Option<String>,
    },
}
