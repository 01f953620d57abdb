//! Paths: a start point plus raw commands, with a derived segment view.
//!
//! The raw command list is the source of truth. The typed segment list and
//! the cumulative length table are computed on first use and memoized; they
//! never change afterwards because a [`Path`] is never mutated in place.

use std::fmt;
use std::sync::OnceLock;

use crate::point::{Point, PointExt, Vector};
use crate::raw::{RawSegment, raw_to_segments, resolve_smooth};
use crate::rect::Rect;
use crate::segment::Segment;
use crate::tolerance::Tolerance;

/// Angle of the containment ray. Irrational so that rays from points with
/// "nice" coordinates do not pass through vertices.
const RAY_ANGLE: f64 = 0.618_033_988_749_894_9;

/// A single subpath.
///
/// # Example
///
/// ```
/// use rhizome_resin_path::{Path, PathBuilder, Point};
///
/// let path = PathBuilder::new(Point::ZERO)
///     .line_to(Point::new(3.0, 0.0))
///     .line_to(Point::new(3.0, 4.0))
///     .build();
/// assert_eq!(path.length(), 7.0);
/// assert_eq!(path.end(), Point::new(3.0, 4.0));
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    start: Point,
    raw: Vec<RawSegment>,
    #[cfg_attr(feature = "serde", serde(skip))]
    cache: PathCache,
}

#[derive(Debug, Clone, Default)]
struct PathCache {
    segments: OnceLock<Vec<Segment>>,
    /// `lengths[i]` is the length of the path before segment `i`; the last
    /// entry is the total.
    lengths: OnceLock<Vec<f64>>,
}

/// A position on a path as a segment index plus a parameter on that segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathLocation {
    pub index: usize,
    pub t: f64,
}

impl PathLocation {
    /// Location at parameter `t` on segment `index`.
    pub fn new(index: usize, t: f64) -> Self {
        Self { index, t }
    }
}

/// The closest point on a path to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    pub point: Point,
    /// Index of the owning segment.
    pub index: usize,
    /// Parameter on the owning segment.
    pub t: f64,
    /// Distance from the query point.
    pub distance: f64,
    /// Length along the path from its start to `point`.
    pub offset: f64,
}

impl PathProjection {
    /// Segment index and parameter of the projected point.
    pub fn location(&self) -> PathLocation {
        PathLocation::new(self.index, self.t)
    }
}

/// An intersection between two paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathIntersection {
    pub point: Point,
    pub index_a: usize,
    pub t_a: f64,
    pub index_b: usize,
    pub t_b: f64,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.raw == other.raw
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Path")
            .field("start", &self.start)
            .field("raw", &self.raw)
            .finish()
    }
}

impl Path {
    /// Creates a path from a start point and raw commands.
    pub fn new(start: Point, raw: Vec<RawSegment>) -> Self {
        Self {
            start,
            raw,
            cache: PathCache::default(),
        }
    }

    /// A degenerate path consisting of a single point.
    pub fn point(at: Point) -> Self {
        Self::new(at, Vec::new())
    }

    /// Builds a path drawing `segments` in order.
    ///
    /// A connecting line is inserted wherever a segment does not start at
    /// the previous segment's end. An empty slice gives a point path at the
    /// origin.
    pub fn from_segments(segments: &[Segment]) -> Self {
        let Some(first) = segments.first() else {
            return Self::point(Point::ZERO);
        };
        let mut raw = Vec::with_capacity(segments.len());
        let mut current = first.start();
        for seg in segments {
            if !seg.start().approx_eq(current, 1e-12) {
                raw.push(RawSegment::Line { to: seg.start() });
            }
            raw.push(RawSegment::from_segment(seg));
            current = seg.end();
        }
        Self::new(first.start(), raw)
    }

    /// Like [`Path::from_segments`] but closes the result, folding a final
    /// line back to the start into the `Close` command.
    pub(crate) fn closed_from_segments(segments: &[Segment]) -> Self {
        let path = Self::from_segments(segments);
        let start = path.start;
        let mut raw = path.raw;
        if matches!(raw.last(), Some(RawSegment::Line { to }) if to.approx_eq(start, 1e-12)) {
            raw.pop();
        }
        raw.push(RawSegment::Close);
        Self::new(start, raw)
    }

    /// First point of the path.
    pub fn start(&self) -> Point {
        self.start
    }

    /// The commands after the initial point.
    pub fn raw(&self) -> &[RawSegment] {
        &self.raw
    }

    /// Final point of the path. Closed paths end at their start.
    pub fn end(&self) -> Point {
        match self.raw.last() {
            Some(r) => r.to().unwrap_or(self.start),
            None => self.start,
        }
    }

    /// True if the last command is `Close`.
    pub fn is_closed(&self) -> bool {
        matches!(self.raw.last(), Some(RawSegment::Close))
    }

    /// The path with a `Close` command appended, if it has none.
    pub fn close(&self) -> Path {
        if self.is_closed() {
            return self.clone();
        }
        let mut raw = self.raw.clone();
        raw.push(RawSegment::Close);
        Path::new(self.start, raw)
    }

    /// Typed segments derived from the raw commands.
    pub fn segments(&self) -> &[Segment] {
        self.cache
            .segments
            .get_or_init(|| raw_to_segments(self.start, &self.raw))
    }

    fn lengths(&self) -> &[f64] {
        self.cache.lengths.get_or_init(|| {
            let mut acc = 0.0;
            let mut table = Vec::with_capacity(self.segments().len() + 1);
            table.push(0.0);
            for seg in self.segments() {
                acc += seg.length();
                table.push(acc);
            }
            table
        })
    }

    // ------------------------------------------------------------------------
    // Length queries
    // ------------------------------------------------------------------------

    /// Total arc length.
    pub fn length(&self) -> f64 {
        self.lengths().last().copied().unwrap_or(0.0)
    }

    /// Total arc length at a custom accuracy (not memoized).
    pub fn length_with(&self, tolerance: &Tolerance) -> f64 {
        self.segments().iter().map(|s| s.length_with(tolerance)).sum()
    }

    /// Segment location at a length offset. Offsets outside
    /// `[0, length]` clamp to the ends.
    pub fn location_at(&self, offset: f64) -> PathLocation {
        let segments = self.segments();
        if segments.is_empty() {
            return PathLocation::new(0, 0.0);
        }
        let lengths = self.lengths();
        let total = self.length();
        let offset = offset.clamp(0.0, total);
        let index = lengths[1..]
            .partition_point(|&end| end < offset)
            .min(segments.len() - 1);
        let t = segments[index].t_at_length(offset - lengths[index]);
        PathLocation::new(index, t)
    }

    /// Length offset of a segment location.
    pub fn offset_of(&self, location: PathLocation) -> f64 {
        let segments = self.segments();
        if segments.is_empty() {
            return 0.0;
        }
        let index = location.index.min(segments.len() - 1);
        self.lengths()[index] + segments[index].length_at(location.t)
    }

    /// Point at a segment location.
    pub fn point_at_location(&self, location: PathLocation) -> Point {
        let segments = self.segments();
        if segments.is_empty() {
            return self.start;
        }
        let index = location.index.min(segments.len() - 1);
        segments[index].point_at(location.t.clamp(0.0, 1.0))
    }

    /// Point at a length offset along the path.
    pub fn point_at(&self, offset: f64) -> Point {
        self.point_at_location(self.location_at(offset))
    }

    /// Unit tangent at a length offset along the path.
    pub fn tangent_at(&self, offset: f64) -> Vector {
        let segments = self.segments();
        if segments.is_empty() {
            return Vector::ZERO;
        }
        let loc = self.location_at(offset);
        segments[loc.index].direction_at(loc.t)
    }

    // ------------------------------------------------------------------------
    // Geometry queries
    // ------------------------------------------------------------------------

    /// Closest point on the path, or `None` for a path without segments.
    pub fn project_point(&self, p: Point) -> Option<PathProjection> {
        let (index, proj) = self
            .segments()
            .iter()
            .map(|s| s.project_point(p))
            .enumerate()
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))?;
        Some(PathProjection {
            point: proj.point,
            index,
            t: proj.t,
            distance: proj.distance,
            offset: self.offset_of(PathLocation::new(index, proj.t)),
        })
    }

    /// All intersections with `other`, ordered along this path.
    pub fn intersections(&self, other: &Path) -> Vec<PathIntersection> {
        self.intersections_with(other, &Tolerance::default())
    }

    /// Intersections with explicit tolerances.
    pub fn intersections_with(&self, other: &Path, tolerance: &Tolerance) -> Vec<PathIntersection> {
        let merge = tolerance.intersection.max(tolerance.point);
        let mut result: Vec<PathIntersection> = Vec::new();
        for (index_a, a) in self.segments().iter().enumerate() {
            for (index_b, b) in other.segments().iter().enumerate() {
                for hit in a.intersections_with(b, tolerance) {
                    if result.iter().any(|r| r.point.distance(hit.point) <= merge) {
                        continue;
                    }
                    result.push(PathIntersection {
                        point: hit.point,
                        index_a,
                        t_a: hit.t1,
                        index_b,
                        t_b: hit.t2,
                    });
                }
            }
        }
        result.sort_by(|x, y| x.index_a.cmp(&y.index_a).then(x.t_a.total_cmp(&y.t_a)));
        result
    }

    /// Axis-aligned bounds of the whole path.
    pub fn bounds(&self) -> Rect {
        self.segments()
            .iter()
            .fold(Rect::point(self.start), |r, s| r.union(s.bounds()))
    }

    /// Even-odd containment test. Open paths are treated as closed by a
    /// straight chord from end to start.
    pub fn is_inside(&self, p: Point) -> bool {
        self.is_inside_with(p, &Tolerance::default())
    }

    /// Containment test with explicit tolerances.
    pub fn is_inside_with(&self, p: Point, tolerance: &Tolerance) -> bool {
        let segments = self.segments();
        if segments.is_empty() || !self.bounds().contains(p) {
            return false;
        }
        let mut closed: Vec<Segment> = segments.to_vec();
        if !self.end().approx_eq(self.start, tolerance.point) {
            closed.push(Segment::line(self.end(), self.start));
        }
        ray_crossings(&closed, p, tolerance) % 2 == 1
    }

    /// True if `p` lies on the path within the point tolerance.
    pub fn is_on(&self, p: Point) -> bool {
        self.is_on_with(p, &Tolerance::default())
    }

    /// On-path test with explicit tolerances.
    pub fn is_on_with(&self, p: Point, tolerance: &Tolerance) -> bool {
        match self.project_point(p) {
            Some(proj) => proj.distance <= tolerance.point,
            None => self.start.distance(p) <= tolerance.point,
        }
    }

    /// Signed area enclosed by the path (implicitly closed).
    ///
    /// Positive when the path runs clockwise in a y-down frame
    /// (counter-clockwise in a y-up frame).
    pub fn signed_area(&self) -> f64 {
        let mut area: f64 = self.segments().iter().map(Segment::area_contribution).sum();
        let end = self.end();
        if end != self.start {
            area += Segment::line(end, self.start).area_contribution();
        }
        area
    }

    /// Absolute enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Winding direction from the shoelace sum over segment start points.
    ///
    /// A positive sum is clockwise in the y-down screen convention. When the
    /// start points alone enclose no area (two curved segments, say), the
    /// exact signed area decides.
    pub fn is_clockwise(&self) -> bool {
        let points: Vec<Point> = self.segments().iter().map(Segment::start).collect();
        let n = points.len();
        let sum: f64 = (0..n).map(|i| points[i].cross(points[(i + 1) % n])).sum();
        let scale = self.bounds().diagonal();
        if sum.abs() > 1e-12 * scale * scale {
            sum > 0.0
        } else {
            self.signed_area() > 0.0
        }
    }

    // ------------------------------------------------------------------------
    // Derived paths
    // ------------------------------------------------------------------------

    /// The same path traversed backward.
    ///
    /// The new start is the old end. Arcs keep their form with the sweep
    /// flag flipped and smooth quadratics become explicit.
    pub fn reverse(&self) -> Path {
        let raw = resolve_smooth(self.start, &self.raw);
        let mut pieces: Vec<(Point, RawSegment)> = Vec::with_capacity(raw.len());
        let mut current = self.start;
        for r in raw {
            let r = match r {
                RawSegment::Close if current.approx_eq(self.start, 1e-12) => {
                    current = self.start;
                    continue;
                }
                RawSegment::Close => RawSegment::Line { to: self.start },
                other => other,
            };
            pieces.push((current, r));
            current = r.to().unwrap_or(self.start);
        }

        let mut reversed: Vec<RawSegment> = pieces
            .iter()
            .rev()
            .map(|&(from, r)| reverse_command(from, r))
            .collect();
        if self.is_closed() {
            if let Some(RawSegment::Line { .. }) = reversed.last() {
                reversed.pop();
            }
            reversed.push(RawSegment::Close);
        }
        Path::new(current, reversed)
    }

    /// Drops raw commands identical to their immediate predecessor.
    pub fn clean(&self) -> Path {
        let mut raw = self.raw.clone();
        raw.dedup();
        Path::new(self.start, raw)
    }

    /// Concatenates `other` onto this path, inserting a connecting line if
    /// it does not start at this path's end.
    pub fn append(&self, other: &Path) -> Path {
        let mut raw = self.raw.clone();
        if !other.start.approx_eq(self.end(), 1e-12) {
            raw.push(RawSegment::Line { to: other.start });
        }
        raw.extend(detached_commands(other));
        Path::new(self.start, raw)
    }

    // ------------------------------------------------------------------------
    // Splitting
    // ------------------------------------------------------------------------

    /// Splits the path at one or two locations, returning two or three
    /// paths. The locations may be given in either order.
    pub fn split(&self, first: PathLocation, second: Option<PathLocation>) -> Vec<Path> {
        let segments = self.segments();
        if segments.is_empty() {
            let n = if second.is_some() { 3 } else { 2 };
            return vec![self.clone(); n];
        }
        let first = clamp_location(first, segments.len());
        let Some(second) = second.map(|l| clamp_location(l, segments.len())) else {
            let (head, tail, _) = cut(segments, first);
            let at = self.point_at_location(first);
            return vec![piece(&head, at), piece(&tail, at)];
        };

        let (first, second) = if (second.index, second.t) < (first.index, first.t) {
            (second, first)
        } else {
            (first, second)
        };
        let (head, tail, origin) = cut(segments, first);
        let second_local = if second.index < origin.index {
            PathLocation::new(0, 0.0)
        } else if second.index == origin.index {
            PathLocation::new(0, (second.t - origin.t) / (1.0 - origin.t))
        } else {
            PathLocation::new(second.index - origin.index, second.t)
        };
        let (middle, suffix) = if tail.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let (m, s, _) = cut(&tail, clamp_location(second_local, tail.len()));
            (m, s)
        };

        let p1 = self.point_at_location(first);
        let p2 = self.point_at_location(second);
        vec![piece(&head, p1), piece(&middle, p1), piece(&suffix, p2)]
    }

    /// Splits at the points of the path closest to `p1` (and `p2`).
    pub fn split_at_points(&self, p1: Point, p2: Option<Point>) -> Vec<Path> {
        let loc = |p: Point| {
            self.project_point(p)
                .map_or(PathLocation::new(0, 0.0), |proj| proj.location())
        };
        self.split(loc(p1), p2.map(loc))
    }
}

/// Where the tail of a cut starts on the original segment list.
#[derive(Debug, Clone, Copy)]
struct TailOrigin {
    index: usize,
    t: f64,
}

const CUT_EPS: f64 = 1e-9;

fn clamp_location(loc: PathLocation, count: usize) -> PathLocation {
    if loc.index >= count {
        PathLocation::new(count - 1, 1.0)
    } else {
        PathLocation::new(loc.index, loc.t.clamp(0.0, 1.0))
    }
}

/// Cuts a segment list at `loc`, splitting the owning segment unless the
/// location sits on a segment boundary.
fn cut(segments: &[Segment], loc: PathLocation) -> (Vec<Segment>, Vec<Segment>, TailOrigin) {
    let i = loc.index;
    if loc.t <= CUT_EPS {
        return (
            segments[..i].to_vec(),
            segments[i..].to_vec(),
            TailOrigin { index: i, t: 0.0 },
        );
    }
    if loc.t >= 1.0 - CUT_EPS {
        return (
            segments[..=i].to_vec(),
            segments[i + 1..].to_vec(),
            TailOrigin { index: i + 1, t: 0.0 },
        );
    }
    let (left, right) = segments[i].split(loc.t);
    let mut head = segments[..i].to_vec();
    head.push(left);
    let mut tail = vec![right];
    tail.extend_from_slice(&segments[i + 1..]);
    (head, tail, TailOrigin { index: i, t: loc.t })
}

fn piece(segments: &[Segment], fallback: Point) -> Path {
    if segments.is_empty() {
        Path::point(fallback)
    } else {
        Path::from_segments(segments)
    }
}

fn reverse_command(from: Point, raw: RawSegment) -> RawSegment {
    match raw {
        RawSegment::Line { .. } => RawSegment::Line { to: from },
        RawSegment::Quadratic { control, .. } => RawSegment::Quadratic { control, to: from },
        RawSegment::Cubic {
            control1, control2, ..
        } => RawSegment::Cubic {
            control1: control2,
            control2: control1,
            to: from,
        },
        RawSegment::Arc {
            radii,
            rotation,
            large_arc,
            sweep,
            ..
        } => RawSegment::Arc {
            radii,
            rotation,
            large_arc,
            sweep: !sweep,
            to: from,
        },
        // Resolved before reversal.
        RawSegment::SmoothQuadratic { .. } | RawSegment::Close => RawSegment::Line { to: from },
    }
}

/// Commands of `path` made independent of their position in a command list:
/// smooth quadratics are explicit and `Close` is a line to the path start.
pub(crate) fn detached_commands(path: &Path) -> Vec<RawSegment> {
    let mut current = path.start;
    let mut out = Vec::with_capacity(path.raw.len());
    for r in resolve_smooth(path.start, &path.raw) {
        let r = match r {
            RawSegment::Close if current.approx_eq(path.start, 1e-12) => continue,
            RawSegment::Close => RawSegment::Line { to: path.start },
            other => other,
        };
        current = r.to().unwrap_or(path.start);
        out.push(r);
    }
    out
}

/// Number of times a ray from `p` crosses the closed loop `segments`.
///
/// Crossings are counted half-open (`t` in `[0, 1)` on each loop segment)
/// so a ray through a joint counts it once.
pub(crate) fn ray_crossings(segments: &[Segment], p: Point, tolerance: &Tolerance) -> usize {
    let Some(first) = segments.first() else {
        return 0;
    };
    let bounds = segments
        .iter()
        .fold(first.bounds(), |r, s| r.union(s.bounds()));
    let reach = 2.0 * (bounds.diagonal() + p.distance(bounds.center())) + 1.0;
    let far = p + Vector::new(RAY_ANGLE.cos(), RAY_ANGLE.sin()) * reach;
    let ray = Segment::line(p, far);
    let ray_bounds = ray.bounds();

    segments
        .iter()
        .filter(|s| s.bounds().overlaps(&ray_bounds, tolerance.point))
        .map(|s| {
            s.intersections_with(&ray, tolerance)
                .iter()
                .filter(|hit| hit.t1 < 1.0 - tolerance.param)
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{PathBuilder, rect};

    fn unit_square() -> Path {
        rect(Point::ZERO, Point::ONE)
    }

    fn wave() -> Path {
        PathBuilder::new(Point::ZERO)
            .curve_to(Point::new(1.0, 2.0), Point::new(2.0, 2.0), Point::new(3.0, 0.0))
            .quad_to(Point::new(4.0, -2.0), Point::new(5.0, 0.0))
            .line_to(Point::new(7.0, 0.0))
            .build()
    }

    #[test]
    fn test_length_and_point_at() {
        let path = unit_square();
        assert!((path.length() - 4.0).abs() < 1e-12);
        assert!(path.point_at(1.5).approx_eq(Point::new(1.0, 0.5), 1e-9));
        assert!(path.point_at(-3.0).approx_eq(Point::ZERO, 1e-12));
        assert!(path.point_at(100.0).approx_eq(Point::ZERO, 1e-12));
        assert!(path.tangent_at(1.5).approx_eq(Point::new(0.0, 1.0), 1e-9));
    }

    #[test]
    fn test_location_offset_round_trip() {
        let path = wave();
        for offset in [0.0, 0.7, 3.1, 5.5, path.length()] {
            let loc = path.location_at(offset);
            assert!((path.offset_of(loc) - offset).abs() < 1e-5);
        }
    }

    #[test]
    fn test_project_point_reports_offset() {
        let path = unit_square();
        let proj = path.project_point(Point::new(1.5, 0.5)).unwrap();
        assert_eq!(proj.index, 1);
        assert!((proj.distance - 0.5).abs() < 1e-12);
        assert!((proj.offset - 1.5).abs() < 1e-9);
        assert!(Path::point(Point::ZERO).project_point(Point::ONE).is_none());
    }

    #[test]
    fn test_is_inside_and_on() {
        let square = unit_square();
        assert!(square.is_inside(Point::new(0.25, 0.25)));
        assert!(!square.is_inside(Point::new(1.25, 1.25)));
        assert!(!square.is_inside(Point::new(-0.5, 0.5)));
        assert!(square.is_on(Point::new(1.0, 0.3)));
        assert!(!square.is_on(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_is_inside_curved() {
        let circle = crate::builder::circle(Point::ZERO, 2.0);
        assert!(circle.is_inside(Point::new(0.0, 0.0)));
        assert!(circle.is_inside(Point::new(1.3, 1.3)));
        assert!(!circle.is_inside(Point::new(1.5, 1.5)));
    }

    #[test]
    fn test_signed_area_and_winding() {
        let square = unit_square();
        assert!((square.signed_area() - 1.0).abs() < 1e-12);
        assert!(square.is_clockwise());
        let rev = square.reverse();
        assert!((rev.signed_area() + 1.0).abs() < 1e-12);
        assert!(!rev.is_clockwise());
    }

    #[test]
    fn test_reverse_closed_is_involution() {
        let square = unit_square();
        assert_eq!(square.reverse().reverse(), square);
        let rev = square.reverse();
        assert_eq!(rev.start(), square.start());
        assert!(rev.is_closed());
    }

    #[test]
    fn test_reverse_open() {
        let path = wave();
        let rev = path.reverse();
        assert_eq!(rev.start(), path.end());
        assert_eq!(rev.end(), path.start());
        assert!((rev.length() - path.length()).abs() < 1e-9);
        let back = rev.reverse();
        for (a, b) in back.segments().iter().zip(path.segments()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_split_single() {
        let path = wave();
        let loc = path.location_at(2.0);
        let pieces = path.split(loc, None);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].end(), pieces[1].start());
        assert!((pieces[0].length() + pieces[1].length() - path.length()).abs() < 1e-6);
    }

    #[test]
    fn test_split_same_segment() {
        let path = wave();
        let pieces = path.split(PathLocation::new(0, 0.6), Some(PathLocation::new(0, 0.2)));
        assert_eq!(pieces.len(), 3);
        let seg = path.segments()[0];
        assert!(pieces[1].start().approx_eq(seg.point_at(0.2), 1e-12));
        assert!(pieces[1].end().approx_eq(seg.point_at(0.6), 1e-12));
        assert_eq!(pieces[0].end(), pieces[1].start());
        assert_eq!(pieces[1].end(), pieces[2].start());
        let total: f64 = pieces.iter().map(Path::length).sum();
        assert!((total - path.length()).abs() < 1e-6);
    }

    #[test]
    fn test_split_different_segments() {
        let path = wave();
        let pieces = path.split(PathLocation::new(0, 0.5), Some(PathLocation::new(2, 0.5)));
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[1].segments().len(), 3);
        assert!(pieces[2].start().approx_eq(Point::new(6.0, 0.0), 1e-12));
        let total: f64 = pieces.iter().map(Path::length).sum();
        assert!((total - path.length()).abs() < 1e-6);
    }

    #[test]
    fn test_split_at_boundary() {
        let path = unit_square();
        let pieces = path.split(PathLocation::new(1, 0.0), None);
        assert_eq!(pieces[0].segments().len(), 1);
        assert_eq!(pieces[1].segments().len(), 3);
    }

    #[test]
    fn test_split_at_points() {
        let path = Path::from_segments(&[Segment::line(Point::ZERO, Point::new(10.0, 0.0))]);
        let pieces = path.split_at_points(Point::new(3.0, 1.0), Some(Point::new(7.0, -1.0)));
        assert!(pieces[1].start().approx_eq(Point::new(3.0, 0.0), 1e-12));
        assert!(pieces[1].end().approx_eq(Point::new(7.0, 0.0), 1e-12));
    }

    #[test]
    fn test_intersections_between_paths() {
        let a = unit_square();
        let b = rect(Point::splat(0.5), Point::splat(1.5));
        let hits = a.intersections(&b);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|h| h.point.approx_eq(Point::new(1.0, 0.5), 1e-9)));
        assert!(hits.iter().any(|h| h.point.approx_eq(Point::new(0.5, 1.0), 1e-9)));
    }

    #[test]
    fn test_clean_drops_repeats() {
        let line = RawSegment::Line {
            to: Point::new(1.0, 0.0),
        };
        let path = Path::new(Point::ZERO, vec![line, line, line, RawSegment::Close]);
        assert_eq!(path.clean().raw(), &[line, RawSegment::Close]);
    }

    #[test]
    fn test_append() {
        let a = Path::from_segments(&[Segment::line(Point::ZERO, Point::new(1.0, 0.0))]);
        let b = Path::from_segments(&[Segment::line(Point::new(2.0, 0.0), Point::new(3.0, 0.0))]);
        let joined = a.append(&b);
        assert_eq!(joined.segments().len(), 3);
        assert_eq!(joined.end(), Point::new(3.0, 0.0));
        assert!((joined.length() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_append_closed_other() {
        let a = Path::point(Point::ZERO);
        let joined = a.append(&unit_square());
        assert!(!joined.is_closed());
        assert_eq!(joined.end(), Point::ZERO);
        assert_eq!(joined.segments().len(), 4);
    }

    #[test]
    fn test_bounds() {
        let b = wave().bounds();
        assert!((b.max.y - 1.5).abs() < 1e-9);
        assert!((b.min.y + 1.0).abs() < 1e-9);
        assert_eq!(b.max.x, 7.0);
    }
}
