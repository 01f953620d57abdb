//! Path construction.

use std::f64::consts::FRAC_PI_8;

use tracing::debug;

use crate::path::{Path, detached_commands};
use crate::point::{Point, PointExt, Vector};
use crate::raw::RawSegment;

/// Builder for paths.
///
/// A builder always has a current subpath. `move_to` after drawing and
/// `close` both finish it; [`PathBuilder::build_set`] returns every
/// subpath while [`PathBuilder::build`] returns only the last one.
///
/// # Example
///
/// ```
/// use rhizome_resin_path::{PathBuilder, Point};
///
/// let triangle = PathBuilder::new(Point::ZERO)
///     .line_to(Point::new(2.0, 0.0))
///     .line_to(Point::new(1.0, 1.0))
///     .close()
///     .build();
/// assert!(triangle.is_closed());
/// assert_eq!(triangle.segments().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct PathBuilder {
    finished: Vec<Path>,
    start: Point,
    current: Point,
    raw: Vec<RawSegment>,
}

impl PathBuilder {
    /// Starts a path at `start`.
    pub fn new(start: Point) -> Self {
        Self {
            finished: Vec::new(),
            start,
            current: start,
            raw: Vec::new(),
        }
    }

    /// Current pen position.
    pub fn current(&self) -> Point {
        self.current
    }

    fn push(mut self, raw: RawSegment) -> Self {
        self.current = raw.to().unwrap_or(self.start);
        self.raw.push(raw);
        self
    }

    fn finish_subpath(&mut self) {
        if !self.raw.is_empty() {
            let raw = std::mem::take(&mut self.raw);
            self.finished.push(Path::new(self.start, raw));
        }
    }

    /// Moves the pen without drawing. Before any drawing this only moves
    /// the start point; afterwards it begins a new subpath.
    pub fn move_to(mut self, to: Point) -> Self {
        self.finish_subpath();
        self.start = to;
        self.current = to;
        self
    }

    /// Straight line to `to`.
    pub fn line_to(self, to: Point) -> Self {
        self.push(RawSegment::Line { to })
    }

    /// Cubic bezier to `to`.
    pub fn curve_to(self, control1: Point, control2: Point, to: Point) -> Self {
        self.push(RawSegment::Cubic {
            control1,
            control2,
            to,
        })
    }

    /// Quadratic bezier through `control` to `to`.
    pub fn quad_to(self, control: Point, to: Point) -> Self {
        self.push(RawSegment::Quadratic { control, to })
    }

    /// Quadratic bezier whose control point mirrors the previous one.
    pub fn smooth_quad_to(self, to: Point) -> Self {
        self.push(RawSegment::SmoothQuadratic { to })
    }

    /// Elliptical arc to `to`; `rotation` is in degrees.
    pub fn arc_to(
        self,
        radii: Vector,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    ) -> Self {
        self.push(RawSegment::Arc {
            radii,
            rotation,
            large_arc,
            sweep,
            to,
        })
    }

    /// Closes the current subpath. Further drawing starts a new subpath at
    /// the same start point.
    pub fn close(mut self) -> Self {
        if self.raw.is_empty() {
            return self;
        }
        self.raw.push(RawSegment::Close);
        self.finish_subpath();
        self.current = self.start;
        self
    }

    /// Appends the commands of `path`, drawing a connecting line if it does
    /// not start at the current position.
    pub fn append(mut self, path: &Path) -> Self {
        if !path.start().approx_eq(self.current, 1e-12) {
            self = self.line_to(path.start());
        }
        for raw in detached_commands(path) {
            self = self.push(raw);
        }
        self
    }

    /// Returns the last subpath.
    pub fn build(self) -> Path {
        let mut set = self.build_set();
        if set.len() > 1 {
            debug!(subpaths = set.len(), "build() keeps only the last subpath");
        }
        set.pop().unwrap_or_else(|| Path::point(Point::ZERO))
    }

    /// Returns every subpath in drawing order.
    pub fn build_set(mut self) -> Vec<Path> {
        let start = self.start;
        self.finish_subpath();
        if self.finished.is_empty() {
            return vec![Path::point(start)];
        }
        self.finished
    }
}

// ============================================================================
// Shapes
// ============================================================================

/// A straight line.
pub fn line(from: Point, to: Point) -> Path {
    PathBuilder::new(from).line_to(to).build()
}

/// An open polyline through `points`.
pub fn polyline(points: &[Point]) -> Path {
    let Some((&first, rest)) = points.split_first() else {
        return Path::point(Point::ZERO);
    };
    rest.iter()
        .fold(PathBuilder::new(first), |b, &p| b.line_to(p))
        .build()
}

/// A closed polygon through `points`.
pub fn polygon(points: &[Point]) -> Path {
    polyline(points).close()
}

/// An axis-aligned rectangle, counter-clockwise in a y-up frame.
pub fn rect(min: Point, max: Point) -> Path {
    PathBuilder::new(min)
        .line_to(Point::new(max.x, min.y))
        .line_to(max)
        .line_to(Point::new(min.x, max.y))
        .close()
        .build()
}

/// A circle made of four cubic quarter arcs.
pub fn circle(center: Point, radius: f64) -> Path {
    ellipse(center, Vector::splat(radius))
}

/// An axis-aligned ellipse made of four cubic quarter arcs.
pub fn ellipse(center: Point, radii: Vector) -> Path {
    let k = 4.0 / 3.0 * FRAC_PI_8.tan();
    let (rx, ry) = (radii.x, radii.y);
    let (kx, ky) = (k * rx, k * ry);
    let c = center;

    PathBuilder::new(Point::new(c.x + rx, c.y))
        .curve_to(
            Point::new(c.x + rx, c.y + ky),
            Point::new(c.x + kx, c.y + ry),
            Point::new(c.x, c.y + ry),
        )
        .curve_to(
            Point::new(c.x - kx, c.y + ry),
            Point::new(c.x - rx, c.y + ky),
            Point::new(c.x - rx, c.y),
        )
        .curve_to(
            Point::new(c.x - rx, c.y - ky),
            Point::new(c.x - kx, c.y - ry),
            Point::new(c.x, c.y - ry),
        )
        .curve_to(
            Point::new(c.x + kx, c.y - ry),
            Point::new(c.x + rx, c.y - ky),
            Point::new(c.x + rx, c.y),
        )
        .close()
        .build()
}
