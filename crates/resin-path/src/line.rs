//! Straight line helpers.
//!
//! [`Line`] is used both as a finite segment and as the carrier of an
//! infinite line (for offset joins and chord intersection).

use crate::point::{Point, PointExt, Vector};

/// A straight line from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    /// Line from `start` to `end`.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Horizontal line at height `y` from `x0` to `x1`.
    pub fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        Self::new(Point::new(x0, y), Point::new(x1, y))
    }

    /// Vertical line at `x` from `y0` to `y1`.
    pub fn vertical(x: f64, y0: f64, y1: f64) -> Self {
        Self::new(Point::new(x, y0), Point::new(x, y1))
    }

    /// `end - start`.
    pub fn vector(&self) -> Vector {
        self.end - self.start
    }

    /// Distance from start to end.
    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    /// Unit direction, or zero for a degenerate line.
    pub fn direction(&self) -> Vector {
        self.vector().normalize_or_zero()
    }

    /// Unit left normal `(-dy, dx)`, or zero for a degenerate line.
    pub fn normal(&self) -> Vector {
        self.direction().perp()
    }

    /// Point halfway along the line.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Point at parameter `t`, extrapolating outside `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }

    /// Projects `p` onto the infinite line.
    ///
    /// Returns the unclamped parameter and the projected point. A degenerate
    /// line projects everything onto its start.
    pub fn project(&self, p: Point) -> (f64, Point) {
        let v = self.vector();
        let len_sq = v.length_squared();
        if len_sq == 0.0 {
            return (0.0, self.start);
        }
        let t = (p - self.start).dot(v) / len_sq;
        (t, self.point_at(t))
    }

    /// Closest point on the finite segment, with its parameter.
    pub fn closest_point(&self, p: Point) -> (f64, Point) {
        let (t, _) = self.project(p);
        let t = t.clamp(0.0, 1.0);
        (t, self.point_at(t))
    }

    /// Distance from `p` to the finite segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        self.closest_point(p).1.distance(p)
    }

    /// Lengthens the line by `amount` at both ends.
    pub fn extend(&self, amount: f64) -> Self {
        let dir = self.direction();
        if dir == Vector::ZERO {
            return *self;
        }
        Self::new(self.start - dir * amount, self.end + dir * amount)
    }

    /// Translates the line along its left normal.
    pub fn offset(&self, distance: f64) -> Self {
        let shift = self.normal() * distance;
        Self::new(self.start + shift, self.end + shift)
    }

    /// Intersection of the two infinite lines carrying `self` and `other`.
    ///
    /// Returns the point and the parameters on each line, or `None` when the
    /// lines are parallel or either is degenerate.
    pub fn intersect_infinite(&self, other: &Line) -> Option<(Point, f64, f64)> {
        let d1 = self.vector();
        let d2 = other.vector();
        let denom = d1.cross(d2);
        let scale = d1.length() * d2.length();
        if scale == 0.0 || denom.abs() <= scale * 1e-12 {
            return None;
        }
        let w = other.start - self.start;
        let t1 = w.cross(d2) / denom;
        let t2 = w.cross(d1) / denom;
        Some((self.point_at(t1), t1, t2))
    }

    /// Intersection of the two finite segments, allowing parameters to
    /// overshoot `[0, 1]` by `eps`. Parameters are clamped on return.
    pub fn intersect_segment(&self, other: &Line, eps: f64) -> Option<(Point, f64, f64)> {
        let (_, t1, t2) = self.intersect_infinite(other)?;
        let range = -eps..=1.0 + eps;
        if !range.contains(&t1) || !range.contains(&t2) {
            return None;
        }
        let t1 = t1.clamp(0.0, 1.0);
        let t2 = t2.clamp(0.0, 1.0);
        Some((self.point_at(t1), t1, t2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let h = Line::horizontal(2.0, 0.0, 5.0);
        assert_eq!(h.start, Point::new(0.0, 2.0));
        assert_eq!(h.length(), 5.0);
        let v = Line::vertical(1.0, 3.0, -1.0);
        assert_eq!(v.direction(), Point::new(0.0, -1.0));
    }

    #[test]
    fn test_normal_is_left() {
        let line = Line::new(Point::ZERO, Point::new(10.0, 0.0));
        assert_eq!(line.normal(), Point::new(0.0, 1.0));
        let off = line.offset(2.0);
        assert_eq!(off.start, Point::new(0.0, 2.0));
        assert_eq!(off.end, Point::new(10.0, 2.0));
    }

    #[test]
    fn test_project_and_closest() {
        let line = Line::new(Point::ZERO, Point::new(4.0, 0.0));
        let (t, p) = line.project(Point::new(6.0, 3.0));
        assert_eq!(t, 1.5);
        assert_eq!(p, Point::new(6.0, 0.0));
        let (t, p) = line.closest_point(Point::new(6.0, 3.0));
        assert_eq!(t, 1.0);
        assert_eq!(p, Point::new(4.0, 0.0));
        assert_eq!(line.distance_to(Point::new(2.0, -3.0)), 3.0);
    }

    #[test]
    fn test_extend() {
        let line = Line::new(Point::ZERO, Point::new(2.0, 0.0)).extend(1.0);
        assert_eq!(line.start, Point::new(-1.0, 0.0));
        assert_eq!(line.end, Point::new(3.0, 0.0));

        let degenerate = Line::new(Point::ONE, Point::ONE);
        assert_eq!(degenerate.extend(5.0), degenerate);
    }

    #[test]
    fn test_intersect_infinite() {
        let a = Line::new(Point::ZERO, Point::new(1.0, 1.0));
        let b = Line::new(Point::new(0.0, 4.0), Point::new(1.0, 3.0));
        let (p, t1, t2) = a.intersect_infinite(&b).unwrap();
        assert!(p.approx_eq(Point::new(2.0, 2.0), 1e-12));
        assert!((t1 - 2.0).abs() < 1e-12);
        assert!((t2 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_lines() {
        let a = Line::horizontal(0.0, 0.0, 1.0);
        let b = Line::horizontal(1.0, 0.0, 1.0);
        assert!(a.intersect_infinite(&b).is_none());
        assert!(a.intersect_segment(&b, 1e-9).is_none());
    }

    #[test]
    fn test_intersect_segment() {
        let a = Line::new(Point::ZERO, Point::new(2.0, 2.0));
        let b = Line::new(Point::new(0.0, 2.0), Point::new(2.0, 0.0));
        let (p, t1, t2) = a.intersect_segment(&b, 0.0).unwrap();
        assert!(p.approx_eq(Point::new(1.0, 1.0), 1e-12));
        assert!((t1 - 0.5).abs() < 1e-12);
        assert!((t2 - 0.5).abs() < 1e-12);

        let short = Line::new(Point::new(0.0, 2.0), Point::new(0.5, 1.5));
        assert!(a.intersect_segment(&short, 1e-9).is_none());
    }
}
