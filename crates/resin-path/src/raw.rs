//! Raw path commands.
//!
//! A path stores its geometry as a start point plus a list of
//! [`RawSegment`] commands. Typed [`Segment`]s are derived from that list.

use crate::arc::arc_to_cubics;
use crate::point::{Point, PointExt, Vector};
use crate::segment::Segment;

/// A single path command. All coordinates are absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawSegment {
    /// Straight line to a point.
    Line { to: Point },
    /// Quadratic bezier with one control point.
    Quadratic { control: Point, to: Point },
    /// Quadratic bezier whose control point is the reflection of the
    /// previous quadratic control point (or the current point when the
    /// previous command was not a quadratic).
    SmoothQuadratic { to: Point },
    /// Cubic bezier with two control points.
    Cubic {
        control1: Point,
        control2: Point,
        to: Point,
    },
    /// Elliptical arc. `rotation` is in degrees.
    Arc {
        radii: Vector,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    /// Straight line back to the path start.
    Close,
}

impl RawSegment {
    /// End point of the command, or `None` for [`RawSegment::Close`], which
    /// ends wherever the path started.
    pub fn to(&self) -> Option<Point> {
        match *self {
            RawSegment::Line { to }
            | RawSegment::Quadratic { to, .. }
            | RawSegment::SmoothQuadratic { to }
            | RawSegment::Cubic { to, .. }
            | RawSegment::Arc { to, .. } => Some(to),
            RawSegment::Close => None,
        }
    }

    /// Applies `f` to every point operand. Arc radii and flags are left
    /// alone.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        match *self {
            RawSegment::Line { to } => RawSegment::Line { to: f(to) },
            RawSegment::Quadratic { control, to } => RawSegment::Quadratic {
                control: f(control),
                to: f(to),
            },
            RawSegment::SmoothQuadratic { to } => RawSegment::SmoothQuadratic { to: f(to) },
            RawSegment::Cubic {
                control1,
                control2,
                to,
            } => RawSegment::Cubic {
                control1: f(control1),
                control2: f(control2),
                to: f(to),
            },
            RawSegment::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
                to,
            } => RawSegment::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
                to: f(to),
            },
            RawSegment::Close => RawSegment::Close,
        }
    }

    /// Raw command drawing `segment` from its start point.
    pub fn from_segment(segment: &Segment) -> Self {
        match *segment {
            Segment::Line { end, .. } => RawSegment::Line { to: end },
            Segment::Quadratic { control, end, .. } => RawSegment::Quadratic { control, to: end },
            Segment::Cubic {
                control1,
                control2,
                end,
                ..
            } => RawSegment::Cubic {
                control1,
                control2,
                to: end,
            },
        }
    }
}

/// Walks a raw command list, tracking the current point and the control
/// point a following `SmoothQuadratic` reflects.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor {
    pub start: Point,
    pub current: Point,
    last_quad_control: Option<Point>,
}

impl Cursor {
    /// Cursor positioned at `start` with no pending control point.
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
            last_quad_control: None,
        }
    }

    /// Control point an implicit quadratic would use from here.
    pub fn smooth_control(&self) -> Point {
        self.last_quad_control
            .map_or(self.current, |c| c.reflect_through(self.current))
    }

    /// Advances over `raw`, returning the command with any smooth quadratic
    /// made explicit.
    pub fn advance(&mut self, raw: &RawSegment) -> RawSegment {
        let explicit = match *raw {
            RawSegment::SmoothQuadratic { to } => RawSegment::Quadratic {
                control: self.smooth_control(),
                to,
            },
            other => other,
        };
        self.last_quad_control = match explicit {
            RawSegment::Quadratic { control, .. } => Some(control),
            _ => None,
        };
        self.current = explicit.to().unwrap_or(self.start);
        explicit
    }
}

/// Replaces every `SmoothQuadratic` with the equivalent explicit
/// `Quadratic`.
pub fn resolve_smooth(start: Point, raw: &[RawSegment]) -> Vec<RawSegment> {
    let mut cursor = Cursor::new(start);
    raw.iter().map(|r| cursor.advance(r)).collect()
}

/// Derives typed segments from a raw command list.
///
/// Arcs expand to cubics. `Close` emits a closing line unless the current
/// point already sits on the start.
pub(crate) fn raw_to_segments(start: Point, raw: &[RawSegment]) -> Vec<Segment> {
    let mut cursor = Cursor::new(start);
    let mut segments = Vec::with_capacity(raw.len());
    for r in raw {
        let from = cursor.current;
        let smooth = cursor.smooth_control();
        match *r {
            RawSegment::Line { to } => segments.push(Segment::line(from, to)),
            RawSegment::Quadratic { control, to } => {
                segments.push(Segment::quadratic(from, control, to))
            }
            RawSegment::SmoothQuadratic { to } => {
                segments.push(Segment::quadratic(from, smooth, to))
            }
            RawSegment::Cubic {
                control1,
                control2,
                to,
            } => segments.push(Segment::cubic(from, control1, control2, to)),
            RawSegment::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
                to,
            } => segments.extend(arc_to_cubics(from, to, radii, rotation, large_arc, sweep)),
            RawSegment::Close => {
                if !from.approx_eq(start, 1e-12) {
                    segments.push(Segment::line(from, start));
                }
            }
        }
        cursor.advance(r);
    }
    segments
}
