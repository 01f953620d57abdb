//! Typed curve segments and their algebra.
//!
//! A [`Segment`] is one piece of a path: a line, a quadratic or a cubic
//! Bezier curve. Every operation returns new values.

use tracing::trace;

use crate::bezier::{
    cubic_bounds, cubic_derivative, cubic_point, cubic_second_derivative, cubic_split,
    gauss_legendre, integrate, quadratic_bounds, quadratic_derivative, quadratic_point,
    quadratic_second_derivative, quadratic_split,
};
use crate::line::Line;
use crate::point::{Point, PointExt, Vector};
use crate::rect::Rect;
use crate::tolerance::Tolerance;

/// A curve segment (line, quadratic, or cubic bezier).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Segment {
    /// Line segment from start to end.
    Line { start: Point, end: Point },
    /// Quadratic bezier curve.
    Quadratic {
        start: Point,
        control: Point,
        end: Point,
    },
    /// Cubic bezier curve.
    Cubic {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    },
}

/// The closest point on a segment to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Closest point on the segment.
    pub point: Point,
    /// Parameter of `point` (0-1).
    pub t: f64,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

/// An intersection between two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// The intersection point.
    pub point: Point,
    /// Parameter on the first segment (0-1).
    pub t1: f64,
    /// Parameter on the second segment (0-1).
    pub t2: f64,
}

const PROJECTION_SAMPLES: usize = 16;
const NEWTON_ITERATIONS: usize = 12;
const MAX_SUBDIVISION_DEPTH: u32 = 40;
/// Parameter overshoot accepted when intersecting leaf chords.
const CHORD_SLACK: f64 = 0.05;
/// Interior samples checked before two segments are treated as coincident.
const OVERLAP_SAMPLES: usize = 8;

impl Segment {
    /// Straight segment.
    pub fn line(start: Point, end: Point) -> Self {
        Segment::Line { start, end }
    }

    /// Quadratic bezier with one control point.
    pub fn quadratic(start: Point, control: Point, end: Point) -> Self {
        Segment::Quadratic {
            start,
            control,
            end,
        }
    }

    /// Cubic bezier with two control points.
    pub fn cubic(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Segment::Cubic {
            start,
            control1,
            control2,
            end,
        }
    }

    /// Builds a segment from 2, 3 or 4 control points.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        match *points {
            [start, end] => Some(Segment::line(start, end)),
            [start, control, end] => Some(Segment::quadratic(start, control, end)),
            [start, c1, c2, end] => Some(Segment::cubic(start, c1, c2, end)),
            _ => None,
        }
    }

    /// Start point.
    pub fn start(&self) -> Point {
        match *self {
            Segment::Line { start, .. }
            | Segment::Quadratic { start, .. }
            | Segment::Cubic { start, .. } => start,
        }
    }

    /// End point.
    pub fn end(&self) -> Point {
        match *self {
            Segment::Line { end, .. }
            | Segment::Quadratic { end, .. }
            | Segment::Cubic { end, .. } => end,
        }
    }

    /// All control points in order, endpoints included.
    pub fn control_points(&self) -> Vec<Point> {
        match *self {
            Segment::Line { start, end } => vec![start, end],
            Segment::Quadratic {
                start,
                control,
                end,
            } => vec![start, control, end],
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => vec![start, control1, control2, end],
        }
    }

    /// True if every control point coincides with the start.
    pub fn is_degenerate(&self) -> bool {
        self.is_degenerate_with(&Tolerance::default())
    }

    /// Degeneracy test against `tolerance.point`.
    pub fn is_degenerate_with(&self, tolerance: &Tolerance) -> bool {
        let start = self.start();
        self.control_points()
            .iter()
            .all(|p| p.distance(start) <= tolerance.point)
    }

    /// Applies `f` to every control point.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        match *self {
            Segment::Line { start, end } => Segment::line(f(start), f(end)),
            Segment::Quadratic {
                start,
                control,
                end,
            } => Segment::quadratic(f(start), f(control), f(end)),
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => Segment::cubic(f(start), f(control1), f(control2), f(end)),
        }
    }

    /// Evaluates the segment at parameter `t` (0-1).
    pub fn point_at(&self, t: f64) -> Point {
        match *self {
            Segment::Line { start, end } => start.lerp(end, t),
            Segment::Quadratic {
                start,
                control,
                end,
            } => quadratic_point(start, control, end, t),
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => cubic_point(start, control1, control2, end, t),
        }
    }

    /// Derivative with respect to `t` (unnormalized tangent).
    pub fn tangent_at(&self, t: f64) -> Vector {
        match *self {
            Segment::Line { start, end } => end - start,
            Segment::Quadratic {
                start,
                control,
                end,
            } => quadratic_derivative(start, control, end, t),
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => cubic_derivative(start, control1, control2, end, t),
        }
    }

    fn second_derivative_at(&self, t: f64) -> Vector {
        match *self {
            Segment::Line { .. } => Vector::ZERO,
            Segment::Quadratic {
                start,
                control,
                end,
            } => quadratic_second_derivative(start, control, end),
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => cubic_second_derivative(start, control1, control2, end, t),
        }
    }

    /// Unit tangent at `t`.
    ///
    /// Where the derivative vanishes (a control point sitting on an
    /// endpoint) the direction is taken from a small finite difference, and
    /// failing that from the chord. Fully degenerate segments return zero.
    pub fn direction_at(&self, t: f64) -> Vector {
        let d = self.tangent_at(t);
        if d.length_squared() > 1e-24 {
            return d.normalize();
        }
        let h = 1e-4;
        let a = self.point_at((t - h).max(0.0));
        let b = self.point_at((t + h).min(1.0));
        let diff = b - a;
        if diff.length_squared() > 1e-24 {
            return diff.normalize();
        }
        (self.end() - self.start()).normalize_or_zero()
    }

    /// Upper bound on the distance of the curve from its chord.
    pub fn flatness(&self) -> f64 {
        match *self {
            Segment::Line { .. } => 0.0,
            Segment::Quadratic {
                start,
                control,
                end,
            } => Line::new(start, end).distance_to(control),
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                let chord = Line::new(start, end);
                chord.distance_to(control1).max(chord.distance_to(control2))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Length
    // ------------------------------------------------------------------------

    /// Arc length of the whole segment.
    pub fn length(&self) -> f64 {
        self.length_with(&Tolerance::default())
    }

    /// Arc length with explicit tolerances.
    pub fn length_with(&self, tolerance: &Tolerance) -> f64 {
        self.length_at_with(1.0, tolerance)
    }

    /// Arc length from the start to parameter `t`.
    pub fn length_at(&self, t: f64) -> f64 {
        self.length_at_with(t, &Tolerance::default())
    }

    /// Arc length from the start to `t` with explicit tolerances.
    pub fn length_at_with(&self, t: f64, tolerance: &Tolerance) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Segment::Line { start, end } => start.distance(end) * t,
            _ => {
                if t == 0.0 {
                    return 0.0;
                }
                let estimate = self.polygon_length();
                if estimate == 0.0 {
                    return 0.0;
                }
                let speed = |u: f64| self.tangent_at(u).length();
                integrate(&speed, 0.0, t, tolerance.length * estimate)
            }
        }
    }

    fn polygon_length(&self) -> f64 {
        self.control_points()
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Parameter at which the arc length from the start equals `distance`.
    ///
    /// Out-of-range distances clamp to 0 or 1.
    pub fn t_at_length(&self, distance: f64) -> f64 {
        self.t_at_length_with(distance, &Tolerance::default())
    }

    /// Inverse of [`Segment::length_at_with`].
    pub fn t_at_length_with(&self, distance: f64, tolerance: &Tolerance) -> f64 {
        let total = self.length_with(tolerance);
        if total <= 0.0 || distance <= 0.0 {
            return 0.0;
        }
        if distance >= total {
            return 1.0;
        }
        if let Segment::Line { .. } = self {
            return distance / total;
        }

        let eps = tolerance.length * total;
        let (mut lo, mut hi) = (0.0, 1.0);
        let mut t = distance / total;
        for _ in 0..64 {
            let err = self.length_at_with(t, tolerance) - distance;
            if err.abs() <= eps {
                return t;
            }
            if err > 0.0 {
                hi = t;
            } else {
                lo = t;
            }
            let speed = self.tangent_at(t).length();
            let newton = t - err / speed;
            t = if speed > 1e-12 && newton > lo && newton < hi {
                newton
            } else {
                0.5 * (lo + hi)
            };
            if hi - lo <= tolerance.param {
                break;
            }
        }
        t
    }

    // ------------------------------------------------------------------------
    // Subdivision
    // ------------------------------------------------------------------------

    /// Splits the segment at parameter `t` into two segments of the same kind.
    pub fn split(&self, t: f64) -> (Segment, Segment) {
        match *self {
            Segment::Line { start, end } => {
                let mid = start.lerp(end, t);
                (Segment::line(start, mid), Segment::line(mid, end))
            }
            Segment::Quadratic {
                start,
                control,
                end,
            } => {
                let ([a0, a1, a2], [b0, b1, b2]) = quadratic_split(start, control, end, t);
                (Segment::quadratic(a0, a1, a2), Segment::quadratic(b0, b1, b2))
            }
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => {
                let ([a0, a1, a2, a3], [b0, b1, b2, b3]) =
                    cubic_split(start, control1, control2, end, t);
                (Segment::cubic(a0, a1, a2, a3), Segment::cubic(b0, b1, b2, b3))
            }
        }
    }

    /// The piece of the segment between parameters `t0` and `t1`.
    ///
    /// Parameters are clamped to [0, 1]; if `t0 > t1` the piece is reversed.
    pub fn subsegment(&self, t0: f64, t1: f64) -> Segment {
        let t0 = t0.clamp(0.0, 1.0);
        let t1 = t1.clamp(0.0, 1.0);
        if t0 > t1 {
            return self.subsegment(t1, t0).reverse();
        }
        let tail = if t0 > 0.0 { self.split(t0).1 } else { *self };
        let remaining = 1.0 - t0;
        if remaining <= f64::EPSILON {
            let end = self.end();
            return self.map_points(|_| end);
        }
        let local = (t1 - t0) / remaining;
        if local >= 1.0 {
            tail
        } else {
            tail.split(local).0
        }
    }

    /// The same curve traversed backward.
    pub fn reverse(&self) -> Segment {
        match *self {
            Segment::Line { start, end } => Segment::line(end, start),
            Segment::Quadratic {
                start,
                control,
                end,
            } => Segment::quadratic(end, control, start),
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => Segment::cubic(end, control2, control1, start),
        }
    }

    /// Degree-elevates the segment to an equivalent cubic.
    pub fn to_cubic(&self) -> Segment {
        match *self {
            Segment::Line { start, end } => {
                let third = (end - start) / 3.0;
                Segment::cubic(start, start + third, end - third, end)
            }
            Segment::Quadratic {
                start,
                control,
                end,
            } => Segment::cubic(
                start,
                start + (control - start) * (2.0 / 3.0),
                end + (control - end) * (2.0 / 3.0),
                end,
            ),
            cubic @ Segment::Cubic { .. } => cubic,
        }
    }

    /// Exact axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        match *self {
            Segment::Line { start, end } => Rect::new(start, end),
            Segment::Quadratic {
                start,
                control,
                end,
            } => quadratic_bounds(start, control, end),
            Segment::Cubic {
                start,
                control1,
                control2,
                end,
            } => cubic_bounds(start, control1, control2, end),
        }
    }

    /// Contribution of this segment to the signed area of a closed path:
    /// half the integral of `x dy - y dx` along the curve.
    ///
    /// The integrand is a polynomial of degree at most five, so five-point
    /// Gauss-Legendre quadrature is exact.
    pub fn area_contribution(&self) -> f64 {
        match *self {
            Segment::Line { start, end } => 0.5 * start.cross(end),
            _ => {
                let f = |t: f64| self.point_at(t).cross(self.tangent_at(t));
                0.5 * gauss_legendre(&f, 0.0, 1.0)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------------

    /// Closest point on the segment to `p`.
    pub fn project_point(&self, p: Point) -> Projection {
        match *self {
            Segment::Line { start, end } => {
                let (t, point) = Line::new(start, end).closest_point(p);
                Projection {
                    point,
                    t,
                    distance: point.distance(p),
                }
            }
            _ => self.project_curve(p),
        }
    }

    fn project_curve(&self, p: Point) -> Projection {
        let mut best_t = 0.0;
        let mut best_dist = f64::INFINITY;
        for i in 0..=PROJECTION_SAMPLES {
            let t = i as f64 / PROJECTION_SAMPLES as f64;
            let d = self.point_at(t).distance_squared(p);
            if d < best_dist {
                best_dist = d;
                best_t = t;
            }
        }

        // Newton on g(t) = (B(t) - p) . B'(t)
        let mut t = best_t;
        for _ in 0..NEWTON_ITERATIONS {
            let diff = self.point_at(t) - p;
            let d1 = self.tangent_at(t);
            let d2 = self.second_derivative_at(t);
            let g = diff.dot(d1);
            let dg = d1.dot(d1) + diff.dot(d2);
            if dg.abs() < 1e-18 {
                break;
            }
            let next = (t - g / dg).clamp(0.0, 1.0);
            if (next - t).abs() < 1e-14 {
                t = next;
                break;
            }
            t = next;
        }

        let refined = self.point_at(t).distance_squared(p);
        let t = if refined <= best_dist { t } else { best_t };
        let point = self.point_at(t);
        Projection {
            point,
            t,
            distance: point.distance(p),
        }
    }

    // ------------------------------------------------------------------------
    // Intersection
    // ------------------------------------------------------------------------

    /// Finds the intersections between two segments, ordered by `t1`.
    ///
    /// Points where an endpoint of one segment lies on the other are
    /// reported too, which covers shared joints and the ends of overlaps.
    /// Where two segments run along each other, only those overlap ends are
    /// returned.
    pub fn intersections(&self, other: &Segment) -> Vec<Intersection> {
        self.intersections_with(other, &Tolerance::default())
    }

    /// Intersections with explicit tolerances.
    pub fn intersections_with(&self, other: &Segment, tolerance: &Tolerance) -> Vec<Intersection> {
        if !self
            .bounds()
            .overlaps(&other.bounds(), tolerance.point.max(tolerance.intersection))
        {
            return Vec::new();
        }

        let mut candidates: Vec<(f64, f64)> = Vec::new();
        self.endpoint_candidates(other, tolerance, &mut candidates);
        match (self, other) {
            (&Segment::Line { start: a0, end: a1 }, &Segment::Line { start: b0, end: b1 }) => {
                if let Some((_, t1, t2)) =
                    Line::new(a0, a1).intersect_segment(&Line::new(b0, b1), tolerance.param)
                {
                    candidates.push((t1, t2));
                }
            }
            _ if self.runs_along(other, &candidates, tolerance) => {
                trace!("coincident segments, keeping overlap ends only");
            }
            _ => subdivide(
                self,
                (0.0, 1.0),
                other,
                (0.0, 1.0),
                tolerance,
                0,
                &mut candidates,
            ),
        }

        let mut found: Vec<(Intersection, f64)> = Vec::new();
        for (t1, t2) in candidates {
            let Some(hit) = refine(self, other, t1, t2, tolerance) else {
                continue;
            };
            let merge_dist = tolerance.intersection.max(tolerance.point);
            match found
                .iter_mut()
                .find(|(existing, _)| existing.point.distance(hit.0.point) <= merge_dist)
            {
                Some(existing) => {
                    if hit.1 < existing.1 {
                        *existing = hit;
                    }
                }
                None => found.push(hit),
            }
        }

        let mut result: Vec<Intersection> = found.into_iter().map(|(i, _)| i).collect();
        result.sort_by(|a, b| a.t1.total_cmp(&b.t1));
        result
    }

    /// Whether `other` follows this segment between the outermost endpoint
    /// candidates, making the whole stretch an overlap rather than a run of
    /// crossings.
    fn runs_along(
        &self,
        other: &Segment,
        candidates: &[(f64, f64)],
        tolerance: &Tolerance,
    ) -> bool {
        let params = candidates.iter().map(|c| c.0);
        let (Some(lo), Some(hi)) = (
            params.clone().min_by(f64::total_cmp),
            params.max_by(f64::total_cmp),
        ) else {
            return false;
        };
        let on = tolerance.intersection.max(tolerance.point);
        if self.point_at(lo).distance(self.point_at(hi)) <= on {
            return false;
        }
        (1..OVERLAP_SAMPLES).all(|k| {
            let t = lo + (hi - lo) * k as f64 / OVERLAP_SAMPLES as f64;
            other.project_point(self.point_at(t)).distance <= on
        })
    }

    fn endpoint_candidates(
        &self,
        other: &Segment,
        tolerance: &Tolerance,
        out: &mut Vec<(f64, f64)>,
    ) {
        for (t1, p) in [(0.0, self.start()), (1.0, self.end())] {
            let proj = other.project_point(p);
            if proj.distance <= tolerance.point {
                out.push((t1, proj.t));
            }
        }
        for (t2, p) in [(0.0, other.start()), (1.0, other.end())] {
            let proj = self.project_point(p);
            if proj.distance <= tolerance.point {
                out.push((proj.t, t2));
            }
        }
    }
}

/// Recursive bounding-box subdivision collecting approximate parameter pairs.
fn subdivide(
    a: &Segment,
    a_range: (f64, f64),
    b: &Segment,
    b_range: (f64, f64),
    tolerance: &Tolerance,
    depth: u32,
    out: &mut Vec<(f64, f64)>,
) {
    let bounds_a = a.bounds();
    let bounds_b = b.bounds();
    if !bounds_a.overlaps(&bounds_b, tolerance.intersection) {
        return;
    }

    let flat = a.flatness() <= tolerance.intersection && b.flatness() <= tolerance.intersection;
    if flat || depth >= MAX_SUBDIVISION_DEPTH {
        if depth >= MAX_SUBDIVISION_DEPTH {
            trace!(depth, "intersection subdivision hit depth limit");
        }
        let chord_a = Line::new(a.start(), a.end());
        let chord_b = Line::new(b.start(), b.end());
        if let Some((_, s, u)) = chord_a.intersect_infinite(&chord_b) {
            let slack = -CHORD_SLACK..=1.0 + CHORD_SLACK;
            if slack.contains(&s) && slack.contains(&u) {
                let t1 = a_range.0 + s.clamp(0.0, 1.0) * (a_range.1 - a_range.0);
                let t2 = b_range.0 + u.clamp(0.0, 1.0) * (b_range.1 - b_range.0);
                out.push((t1, t2));
            }
        }
        return;
    }

    let a_mid = 0.5 * (a_range.0 + a_range.1);
    let b_mid = 0.5 * (b_range.0 + b_range.1);
    if bounds_a.diagonal() >= bounds_b.diagonal() {
        let (left, right) = a.split(0.5);
        subdivide(&left, (a_range.0, a_mid), b, b_range, tolerance, depth + 1, out);
        subdivide(&right, (a_mid, a_range.1), b, b_range, tolerance, depth + 1, out);
    } else {
        let (left, right) = b.split(0.5);
        subdivide(a, a_range, &left, (b_range.0, b_mid), tolerance, depth + 1, out);
        subdivide(a, a_range, &right, (b_mid, b_range.1), tolerance, depth + 1, out);
    }
}

/// Newton refinement of an approximate intersection.
///
/// Returns the intersection and its residual distance, or `None` when the
/// candidate does not describe a real intersection.
fn refine(
    a: &Segment,
    b: &Segment,
    t1: f64,
    t2: f64,
    tolerance: &Tolerance,
) -> Option<(Intersection, f64)> {
    let residual = |t1: f64, t2: f64| a.point_at(t1).distance(b.point_at(t2));
    let (mut s, mut u) = (t1, t2);
    for _ in 0..NEWTON_ITERATIONS {
        let f = a.point_at(s) - b.point_at(u);
        if f.length() <= 1e-14 {
            break;
        }
        let d1 = a.tangent_at(s);
        let d2 = b.tangent_at(u);
        let det = -d1.cross(d2);
        if det.abs() <= 1e-18 {
            break;
        }
        s = (s + f.cross(d2) / det).clamp(0.0, 1.0);
        u = (u - d1.cross(f) / det).clamp(0.0, 1.0);
    }

    let (s, u) = if residual(s, u) <= residual(t1, t2) {
        (s, u)
    } else {
        (t1, t2)
    };
    let dist = residual(s, u);
    if dist > tolerance.intersection.max(tolerance.point) {
        return None;
    }
    let point = a.point_at(s).midpoint(b.point_at(u));
    Some((Intersection { point, t1: s, t2: u }, dist))
}
