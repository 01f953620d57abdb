//! Compact path text notation.
//!
//! The grammar is a strict subset of SVG path data: absolute `M`, `L`, `C`,
//! `Q`, `T`, `A` and `Z` commands only. Operands are separated by
//! whitespace, a single comma, or both. A command letter is never implied
//! by a following operand list, so every command carries exactly its own
//! operands. Anything outside the grammar is an error carrying the byte
//! offset where parsing stopped.
//!
//! # Example
//!
//! ```
//! use rhizome_resin_path::{Path, Point};
//!
//! let path = Path::from_path_string("M 0,0 L 10,0 Q 15,5 10,10 Z").unwrap();
//! assert!(path.is_closed());
//! assert_eq!(path.end(), Point::ZERO);
//! assert_eq!(path.as_path_string(), "M 0,0 L 10,0 Q 15,5 10,10 Z");
//! ```

use crate::error::{PathError, PathResult};
use crate::path::Path;
use crate::point::{Point, Vector};
use crate::raw::RawSegment;

/// Writer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NotationOptions {
    /// Decimal places kept for every number. Trailing zeros are trimmed.
    pub precision: usize,
}

impl Default for NotationOptions {
    fn default() -> Self {
        Self { precision: 6 }
    }
}

impl NotationOptions {
    /// Sets the number of decimal places written.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Byte-level scanner over path data.
struct Scanner<'a> {
    data: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a str) -> Self {
        Self { data, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.data[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Skips the separator in front of an operand. The first operand of a
    /// command may only be preceded by whitespace.
    fn skip_separator(&mut self, first: bool) {
        self.skip_whitespace();
        if !first && self.peek() == Some(',') {
            self.bump();
            self.skip_whitespace();
        }
    }

    /// Reads the longest run of number characters.
    fn token(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            self.bump();
        }
        &self.data[start..self.pos]
    }

    fn missing(&self, expected: &'static str) -> PathError {
        match self.peek() {
            None => PathError::UnexpectedEnd { expected },
            Some(found) => PathError::Parse {
                offset: self.pos,
                message: format!("expected {expected}, found '{found}'"),
            },
        }
    }

    fn number(&mut self, first: bool, expected: &'static str) -> PathResult<f64> {
        self.skip_separator(first);
        let offset = self.pos;
        let text = self.token();
        if text.is_empty() {
            return Err(self.missing(expected));
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(PathError::InvalidNumber {
                text: text.to_string(),
                offset,
            }),
        }
    }

    fn point(&mut self, first: bool) -> PathResult<Point> {
        let x = self.number(first, "x coordinate")?;
        let y = self.number(false, "y coordinate")?;
        Ok(Point::new(x, y))
    }

    fn flag(&mut self) -> PathResult<bool> {
        self.skip_separator(false);
        let offset = self.pos;
        match self.token() {
            "" => Err(self.missing("arc flag")),
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(PathError::InvalidFlag { offset }),
        }
    }

    fn arc(&mut self) -> PathResult<RawSegment> {
        let rx = self.number(true, "arc radius")?;
        let ry = self.number(false, "arc radius")?;
        let rotation = self.number(false, "arc rotation")?;
        let large_arc = self.flag()?;
        let sweep = self.flag()?;
        let to = self.point(false)?;
        Ok(RawSegment::Arc {
            radii: Vector::new(rx, ry),
            rotation,
            large_arc,
            sweep,
            to,
        })
    }
}

/// A subpath being read.
struct Pending {
    start: Point,
    raw: Vec<RawSegment>,
}

/// Parses path data holding one or more `M`-started subpaths.
///
/// Every `M` begins a new subpath; an `M` with no drawing commands after it
/// yields a single-point path.
pub fn parse_path_set(data: &str) -> PathResult<Vec<Path>> {
    let mut scanner = Scanner::new(data);
    scanner.skip_whitespace();
    if scanner.peek().is_none() {
        return Err(PathError::Empty);
    }
    if scanner.peek() != Some('M') {
        return Err(PathError::MissingMoveTo {
            offset: scanner.pos,
        });
    }

    let mut paths = Vec::new();
    let mut pending: Option<Pending> = None;
    loop {
        scanner.skip_whitespace();
        let offset = scanner.pos;
        let Some(command) = scanner.bump() else {
            break;
        };

        if command == 'M' {
            if let Some(done) = pending.take() {
                paths.push(Path::new(done.start, done.raw));
            }
            pending = Some(Pending {
                start: scanner.point(true)?,
                raw: Vec::new(),
            });
            continue;
        }

        let Some(current) = pending.as_mut() else {
            return Err(PathError::Parse {
                offset,
                message: "expected 'M' after 'Z'".to_string(),
            });
        };
        let raw = match command {
            'L' => RawSegment::Line {
                to: scanner.point(true)?,
            },
            'C' => RawSegment::Cubic {
                control1: scanner.point(true)?,
                control2: scanner.point(false)?,
                to: scanner.point(false)?,
            },
            'Q' => RawSegment::Quadratic {
                control: scanner.point(true)?,
                to: scanner.point(false)?,
            },
            'T' => RawSegment::SmoothQuadratic {
                to: scanner.point(true)?,
            },
            'A' => scanner.arc()?,
            'Z' => RawSegment::Close,
            c if c.is_alphabetic() => {
                return Err(PathError::UnsupportedCommand { command: c, offset });
            }
            c => {
                return Err(PathError::Parse {
                    offset,
                    message: format!("expected a command, found '{c}'"),
                });
            }
        };
        current.raw.push(raw);
        if raw == RawSegment::Close {
            if let Some(done) = pending.take() {
                paths.push(Path::new(done.start, done.raw));
            }
        }
    }

    if let Some(done) = pending {
        paths.push(Path::new(done.start, done.raw));
    }
    Ok(paths)
}

/// Serializes several subpaths, separated by spaces.
pub fn path_set_string(paths: &[Path], options: &NotationOptions) -> String {
    paths
        .iter()
        .map(|p| p.as_path_string_with(options))
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Writing
// ============================================================================

fn push_number(out: &mut String, value: f64, precision: usize) {
    let mut text = format!("{value:.precision$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    out.push_str(&text);
}

fn push_point(out: &mut String, p: Point, precision: usize) {
    push_number(out, p.x, precision);
    out.push(',');
    push_number(out, p.y, precision);
}

impl Path {
    /// Serializes the path with default options.
    pub fn as_path_string(&self) -> String {
        self.as_path_string_with(&NotationOptions::default())
    }

    /// Writes the path using `options`.
    pub fn as_path_string_with(&self, options: &NotationOptions) -> String {
        let precision = options.precision;
        let mut out = String::from("M ");
        push_point(&mut out, self.start(), precision);
        for raw in self.raw() {
            out.push(' ');
            match *raw {
                RawSegment::Line { to } => {
                    out.push_str("L ");
                    push_point(&mut out, to, precision);
                }
                RawSegment::Quadratic { control, to } => {
                    out.push_str("Q ");
                    push_point(&mut out, control, precision);
                    out.push(' ');
                    push_point(&mut out, to, precision);
                }
                RawSegment::SmoothQuadratic { to } => {
                    out.push_str("T ");
                    push_point(&mut out, to, precision);
                }
                RawSegment::Cubic {
                    control1,
                    control2,
                    to,
                } => {
                    out.push_str("C ");
                    push_point(&mut out, control1, precision);
                    out.push(' ');
                    push_point(&mut out, control2, precision);
                    out.push(' ');
                    push_point(&mut out, to, precision);
                }
                RawSegment::Arc {
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                    to,
                } => {
                    out.push_str("A ");
                    push_point(&mut out, radii, precision);
                    out.push(' ');
                    push_number(&mut out, rotation, precision);
                    out.push_str(&format!(" {},{} ", u8::from(large_arc), u8::from(sweep)));
                    push_point(&mut out, to, precision);
                }
                RawSegment::Close => out.push('Z'),
            }
        }
        out
    }

    /// Parses path data holding exactly one subpath.
    pub fn from_path_string(data: &str) -> PathResult<Path> {
        let mut paths = parse_path_set(data)?;
        match paths.len() {
            1 => paths.pop().ok_or(PathError::Empty),
            n => Err(PathError::MultipleSubpaths(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{PathBuilder, circle, rect};
    use crate::point::{PointExt, Vector};

    #[test]
    fn test_parse_all_commands() {
        let path = Path::from_path_string(
            "M 1,2 L 3,4 C 5,6 7,8 9,10 Q 11,12 13,14 T 15,16 A 5,3 30 1,0 20,20 Z",
        )
        .unwrap();
        assert_eq!(path.start(), Point::new(1.0, 2.0));
        assert_eq!(path.raw().len(), 6);
        assert_eq!(
            path.raw()[4],
            RawSegment::Arc {
                radii: Vector::new(5.0, 3.0),
                rotation: 30.0,
                large_arc: true,
                sweep: false,
                to: Point::new(20.0, 20.0),
            }
        );
        assert!(path.is_closed());
    }

    #[test]
    fn test_separators() {
        let a = Path::from_path_string("M1,2L3,4").unwrap();
        let b = Path::from_path_string("  M 1 2 L 3 , 4  ").unwrap();
        let c = Path::from_path_string("M1 ,2\n\tL3\t4").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        let d = Path::from_path_string("M 1e1,-2.5E-1 L .5,+3").unwrap();
        assert_eq!(d.start(), Point::new(10.0, -0.25));
        assert_eq!(d.end(), Point::new(0.5, 3.0));
    }

    #[test]
    fn test_rejects_relative_and_shorthand_commands() {
        for (data, command) in [
            ("M 0,0 l 1,1", 'l'),
            ("M 0,0 H 5", 'H'),
            ("M 0,0 S 1,1 2,2", 'S'),
        ] {
            assert_eq!(
                Path::from_path_string(data),
                Err(PathError::UnsupportedCommand { command, offset: 6 })
            );
        }
    }

    #[test]
    fn test_rejects_implicit_repetition() {
        let err = Path::from_path_string("M 0,0 L 1,1 2,2").unwrap_err();
        assert!(matches!(err, PathError::Parse { offset: 12, .. }), "{err:?}");
    }

    #[test]
    fn test_missing_operands() {
        assert_eq!(
            Path::from_path_string("M 0,0 L 1"),
            Err(PathError::UnexpectedEnd {
                expected: "y coordinate"
            })
        );
        let err = Path::from_path_string("M 0,0 L 1 Z").unwrap_err();
        assert!(matches!(err, PathError::Parse { offset: 10, .. }), "{err:?}");
    }

    #[test]
    fn test_invalid_numbers_and_flags() {
        assert_eq!(
            Path::from_path_string("M 0,0 L 1-2,3"),
            Err(PathError::InvalidNumber {
                text: "1-2".to_string(),
                offset: 8
            })
        );
        assert!(matches!(
            Path::from_path_string("M 0,0 L 1e999,0"),
            Err(PathError::InvalidNumber { .. })
        ));
        assert_eq!(
            Path::from_path_string("M 0,0 A 1,1 0 2,0 1,1"),
            Err(PathError::InvalidFlag { offset: 14 })
        );
        assert_eq!(
            Path::from_path_string("M 0,0 A 1,1 0 01,0 1,1"),
            Err(PathError::InvalidFlag { offset: 14 })
        );
    }

    #[test]
    fn test_structure_errors() {
        assert_eq!(Path::from_path_string("   "), Err(PathError::Empty));
        assert_eq!(
            Path::from_path_string(" L 1,1"),
            Err(PathError::MissingMoveTo { offset: 1 })
        );
        assert_eq!(
            Path::from_path_string("M 0,0 L 1,0 M 5,5 L 6,5"),
            Err(PathError::MultipleSubpaths(2))
        );
        let err = Path::from_path_string("M 0,0 L 1,0 Z L 2,2").unwrap_err();
        assert!(matches!(err, PathError::Parse { offset: 14, .. }), "{err:?}");
        let err = Path::from_path_string("M 0,0 L 1,0 ~").unwrap_err();
        assert!(matches!(err, PathError::Parse { offset: 12, .. }), "{err:?}");
    }

    #[test]
    fn test_parse_path_set() {
        let set = parse_path_set("M 0,0 L 1,0 L 1,1 Z M 5,5 L 6,5 M 9,9").unwrap();
        assert_eq!(set.len(), 3);
        assert!(set[0].is_closed());
        assert_eq!(set[1].start(), Point::new(5.0, 5.0));
        assert_eq!(set[2], Path::point(Point::new(9.0, 9.0)));
        let text = path_set_string(&set, &NotationOptions::default());
        assert_eq!(text, "M 0,0 L 1,0 L 1,1 Z M 5,5 L 6,5 M 9,9");
        assert_eq!(parse_path_set(&text).unwrap(), set);
    }

    #[test]
    fn test_number_formatting() {
        let path = PathBuilder::new(Point::new(-0.0000001, 1.5))
            .line_to(Point::new(2.0 / 3.0, -10.0))
            .build();
        assert_eq!(path.as_path_string(), "M 0,1.5 L 0.666667,-10");
        assert_eq!(
            path.as_path_string_with(&NotationOptions::default().with_precision(2)),
            "M 0,1.5 L 0.67,-10"
        );
        assert_eq!(
            path.as_path_string_with(&NotationOptions::default().with_precision(0)),
            "M 0,2 L 1,-10"
        );
    }

    #[test]
    fn test_arc_output() {
        let path = PathBuilder::new(Point::new(1.0, 0.0))
            .arc_to(Vector::new(1.0, 1.0), 0.0, false, true, Point::new(0.0, 1.0))
            .build();
        assert_eq!(path.as_path_string(), "M 1,0 A 1,1 0 0,1 0,1");
    }

    #[test]
    fn test_round_trip() {
        let paths = [
            rect(Point::new(0.5, 0.25), Point::new(3.0, 2.0)),
            circle(Point::new(1.0, -2.0), 3.3),
            PathBuilder::new(Point::ZERO)
                .quad_to(Point::new(1.0, 1.0), Point::new(2.0, 0.0))
                .smooth_quad_to(Point::new(4.0, 0.0))
                .arc_to(Vector::new(2.0, 1.0), 15.0, true, false, Point::new(6.0, 1.0))
                .build(),
        ];
        for path in paths {
            let parsed = Path::from_path_string(&path.as_path_string()).unwrap();
            assert_eq!(parsed.raw().len(), path.raw().len());
            for i in 0..=16 {
                let d = path.length() * i as f64 / 16.0;
                assert!(parsed.point_at(d).approx_eq(path.point_at(d), 1e-5));
            }
        }
    }
}
