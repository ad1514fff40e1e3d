//! Path data reduction: SVG `d` attribute to straight polylines.
//!
//! Only the straight-line commands are accepted: `M`, `L`, `H`, `V` and
//! `Z`, in absolute and relative forms. Every subpath becomes its own
//! polyline; `Z` appends the closing segment back to the subpath start.
//! Any curve or arc command is rejected rather than approximated.
//!
//! Coordinates are returned in document units, untransformed, at full
//! `f64` precision. [`Data::parse`] reads parameters as `f32`, which
//! rounds distinct coordinates above 2^24 onto each other and overflows
//! past `f32::MAX`, so it only supplies the command structure; the
//! values themselves are re-read from the attribute text.

use svg::node::element::path::{Command, Data, Position};

use plotpath_core::{Point, Polyline};

use crate::error::SvgError;

/// Accumulates subpaths while walking the command list.
#[derive(Debug, Default)]
struct Tracer {
    polylines: Vec<Polyline>,
    current: Vec<Point>,
    pen: Point,
    subpath_start: Point,
}

impl Tracer {
    fn resolve(&self, position: &Position, x: f64, y: f64) -> Point {
        match position {
            Position::Absolute => Point::new(x, y),
            Position::Relative => Point::new(self.pen.x + x, self.pen.y + y),
        }
    }

    /// Finish the open subpath. Lone move-tos draw nothing and are dropped.
    fn flush(&mut self) {
        let points = std::mem::take(&mut self.current);
        if points.len() >= 2 {
            self.polylines.push(Polyline::new(points));
        }
    }

    fn move_to(&mut self, p: Point) {
        self.flush();
        self.pen = p;
        self.subpath_start = p;
        self.current.push(p);
    }

    fn line_to(&mut self, p: Point) {
        if self.current.is_empty() {
            // Drawing straight after `Z` continues from the closed start.
            self.current.push(self.pen);
        }
        self.current.push(p);
        self.pen = p;
    }

    fn close(&mut self) {
        if !self.current.is_empty() && self.pen != self.subpath_start {
            self.current.push(self.subpath_start);
        }
        self.pen = self.subpath_start;
        self.flush();
    }
}

/// Path numbers in document order, read as `f64`.
struct Numbers {
    values: std::vec::IntoIter<f64>,
}

fn skip_digits(bytes: &[u8], i: &mut usize) -> usize {
    let start = *i;
    while bytes.get(*i).is_some_and(u8::is_ascii_digit) {
        *i += 1;
    }
    *i - start
}

impl Numbers {
    /// Scan every number of `d`. Command letters, whitespace and commas
    /// are separators; `1-2` and `.5.5` split the way the SVG grammar
    /// says.
    fn scan(d: &str) -> Result<Self, SvgError> {
        let bytes = d.as_bytes();
        let mut values = Vec::new();
        let mut i = 0;
        while let Some(&b) = bytes.get(i) {
            if !(b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.')) {
                i += 1;
                continue;
            }
            let start = i;
            if matches!(b, b'+' | b'-') {
                i += 1;
            }
            let mut mantissa = skip_digits(bytes, &mut i);
            if bytes.get(i) == Some(&b'.') {
                i += 1;
                mantissa += skip_digits(bytes, &mut i);
            }
            if mantissa == 0 {
                continue;
            }
            if matches!(bytes.get(i), Some(b'e' | b'E')) {
                let mut j = i + 1;
                if matches!(bytes.get(j), Some(b'+' | b'-')) {
                    j += 1;
                }
                if skip_digits(bytes, &mut j) > 0 {
                    i = j;
                }
            }
            let text = &d[start..i];
            let value = text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| SvgError::PathNumber(text.to_string()))?;
            values.push(value);
        }
        Ok(Self {
            values: values.into_iter(),
        })
    }

    /// The next `count` numbers.
    fn take(&mut self, count: usize) -> Result<Vec<f64>, SvgError> {
        let taken: Vec<f64> = self.values.by_ref().take(count).collect();
        if taken.len() == count {
            Ok(taken)
        } else {
            Err(SvgError::PathNumberCount {
                expected: count,
                found: taken.len(),
            })
        }
    }
}

/// Split a flat parameter list into coordinate pairs.
fn pairs(command: char, params: &[f64]) -> Result<Vec<(f64, f64)>, SvgError> {
    if params.is_empty() || params.len() % 2 != 0 {
        return Err(SvgError::PathParameters {
            command,
            count: params.len(),
        });
    }
    Ok(params.chunks_exact(2).map(|c| (c[0], c[1])).collect())
}

/// Reduce a `d` attribute to straight polylines.
///
/// # Errors
///
/// Returns [`SvgError::PathData`] if the data does not parse,
/// [`SvgError::PathParameters`] for a wrong parameter count, and
/// [`SvgError::UnsupportedSegment`] for any curve or arc command.
pub fn trace_path_data(d: &str) -> Result<Vec<Polyline>, SvgError> {
    let data = Data::parse(d).map_err(SvgError::PathData)?;
    let mut numbers = Numbers::scan(d)?;
    let mut tracer = Tracer::default();

    for command in data.iter() {
        match command {
            Command::Move(position, params) => {
                let coords = pairs('M', &numbers.take(params.len())?)?;
                let mut coords = coords.into_iter();
                if let Some((x, y)) = coords.next() {
                    let p = tracer.resolve(position, x, y);
                    tracer.move_to(p);
                }
                // Extra pairs after a move-to are implicit line-tos.
                for (x, y) in coords {
                    let p = tracer.resolve(position, x, y);
                    tracer.line_to(p);
                }
            }
            Command::Line(position, params) => {
                for (x, y) in pairs('L', &numbers.take(params.len())?)? {
                    let p = tracer.resolve(position, x, y);
                    tracer.line_to(p);
                }
            }
            Command::HorizontalLine(position, params) => {
                for x in numbers.take(params.len())? {
                    let p = match position {
                        Position::Absolute => Point::new(x, tracer.pen.y),
                        Position::Relative => Point::new(tracer.pen.x + x, tracer.pen.y),
                    };
                    tracer.line_to(p);
                }
            }
            Command::VerticalLine(position, params) => {
                for y in numbers.take(params.len())? {
                    let p = match position {
                        Position::Absolute => Point::new(tracer.pen.x, y),
                        Position::Relative => Point::new(tracer.pen.x, tracer.pen.y + y),
                    };
                    tracer.line_to(p);
                }
            }
            Command::Close => tracer.close(),
            Command::QuadraticCurve(..) => {
                return Err(SvgError::UnsupportedSegment("quadratic curve"));
            }
            Command::SmoothQuadraticCurve(..) => {
                return Err(SvgError::UnsupportedSegment("smooth quadratic curve"));
            }
            Command::CubicCurve(..) => {
                return Err(SvgError::UnsupportedSegment("cubic curve"));
            }
            Command::SmoothCubicCurve(..) => {
                return Err(SvgError::UnsupportedSegment("smooth cubic curve"));
            }
            Command::EllipticalArc(..) => {
                return Err(SvgError::UnsupportedSegment("elliptical arc"));
            }
        }
    }
    tracer.flush();

    Ok(tracer.polylines)
}
