//! Axis-aligned bounding rectangles.

use crate::point::Point;

/// Axis-aligned bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Rectangle spanning two corners in any order.
    pub fn new(min: Point, max: Point) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// A zero-size rectangle at `p`.
    pub fn point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest rectangle containing every point, or `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::point(first), |r, p| r.include(p)))
    }

    /// Extent along x.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y.
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center point.
    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Length of the diagonal.
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }

    /// Grows the rectangle to contain `p`.
    pub fn include(self, p: Point) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Rect) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Pads the rectangle by `amount` on every side.
    pub fn expand(self, amount: f64) -> Self {
        Self {
            min: self.min - amount,
            max: self.max + amount,
        }
    }

    /// True if the rectangles touch or overlap, allowing a gap of `eps`.
    pub fn overlaps(&self, other: &Rect, eps: f64) -> bool {
        self.min.x <= other.max.x + eps
            && self.max.x + eps >= other.min.x
            && self.min.y <= other.max.y + eps
            && self.max.y + eps >= other.min.y
    }

    /// Whether `p` lies inside or on the border.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
