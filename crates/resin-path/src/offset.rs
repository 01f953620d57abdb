//! Parallel offsetting.
//!
//! Uses the Tiller-Hanson construction: every control-polygon edge is moved
//! along its left normal and the moved edges are re-joined where their
//! carrying lines meet. Lines offset exactly; curves come out as an
//! approximation whose error grows with curvature and distance.

use tracing::trace;

use crate::line::Line;
use crate::path::Path;
use crate::point::{Point, PointExt, Vector};
use crate::segment::Segment;
use crate::tolerance::Tolerance;

/// Offset control polygon of one segment.
#[derive(Debug, Clone)]
struct OffsetPolygon {
    points: Vec<Point>,
    /// Index of the last point coinciding with the start before offsetting.
    lead: usize,
    /// Index of the first point coinciding with the end before offsetting.
    trail: usize,
    first_edge: Line,
    last_edge: Line,
}

impl OffsetPolygon {
    fn new(segment: &Segment, distance: f64, tolerance: &Tolerance) -> Option<Self> {
        let points = segment.control_points();
        let edges: Vec<Line> = points.windows(2).map(|w| Line::new(w[0], w[1])).collect();
        let solid: Vec<usize> = (0..edges.len())
            .filter(|&i| edges[i].length() > tolerance.point)
            .collect();
        let (&lead, &trail) = (solid.first()?, solid.last()?);

        // Degenerate edges borrow the normal of the nearest solid edge.
        let normal_of = |edge: usize| -> Vector {
            let nearest = solid
                .iter()
                .min_by_key(|&&i| i.abs_diff(edge))
                .copied()
                .unwrap_or(lead);
            edges[nearest].normal()
        };
        let solid_edge = |i: usize| edges[i].length() > tolerance.point;

        let last = points.len() - 1;
        let mut offset = Vec::with_capacity(points.len());
        for (i, &p) in points.iter().enumerate() {
            let q = if i == 0 {
                p + normal_of(0) * distance
            } else if i == last {
                p + normal_of(last - 1) * distance
            } else if solid_edge(i - 1) && solid_edge(i) {
                let before = edges[i - 1].offset(distance);
                let after = edges[i].offset(distance);
                join_point(&before, &after, tolerance).unwrap_or(p + edges[i].normal() * distance)
            } else if solid_edge(i) {
                p + edges[i].normal() * distance
            } else {
                p + normal_of(i - 1) * distance
            };
            offset.push(q);
        }

        Some(Self {
            points: offset,
            lead,
            trail: trail + 1,
            first_edge: edges[lead].offset(distance),
            last_edge: edges[trail].offset(distance),
        })
    }

    fn set_start(&mut self, p: Point) {
        for q in &mut self.points[..=self.lead] {
            *q = p;
        }
    }

    fn set_end(&mut self, p: Point) {
        for q in &mut self.points[self.trail..] {
            *q = p;
        }
    }
}

/// Meeting point of two offset edges, or `None` when they are parallel.
fn join_point(before: &Line, after: &Line, tolerance: &Tolerance) -> Option<Point> {
    if before.direction().cross(after.direction()).abs() <= tolerance.join {
        return None;
    }
    before.intersect_infinite(after).map(|(p, _, _)| p)
}

fn join(left: &mut OffsetPolygon, right: &mut OffsetPolygon, tolerance: &Tolerance) {
    if let Some(p) = join_point(&left.last_edge, &right.first_edge, tolerance) {
        left.set_end(p);
        right.set_start(p);
    }
}

impl Path {
    /// Offsets the path by `distance` along the left normal of its direction
    /// (`(-dy, dx)` for direction `(dx, dy)`).
    ///
    /// Curves are approximated; see the module documentation.
    ///
    /// # Example
    ///
    /// ```
    /// use rhizome_resin_path::{Point, line};
    ///
    /// let moved = line(Point::ZERO, Point::new(10.0, 0.0)).offset(2.0);
    /// assert_eq!(moved.start(), Point::new(0.0, 2.0));
    /// assert_eq!(moved.end(), Point::new(10.0, 2.0));
    /// ```
    pub fn offset(&self, distance: f64) -> Path {
        self.offset_with(distance, &Tolerance::default())
    }

    /// Offsets the path with explicit tolerances.
    pub fn offset_with(&self, distance: f64, tolerance: &Tolerance) -> Path {
        if distance == 0.0 {
            return self.clone();
        }
        let mut polygons: Vec<OffsetPolygon> = self
            .segments()
            .iter()
            .filter_map(|s| OffsetPolygon::new(s, distance, tolerance))
            .collect();
        if polygons.is_empty() {
            trace!("offset of a path without extent returns it unchanged");
            return self.clone();
        }

        for i in 1..polygons.len() {
            let (head, tail) = polygons.split_at_mut(i);
            join(&mut head[i - 1], &mut tail[0], tolerance);
        }
        let closed = self.is_closed();
        if closed && polygons.len() > 1 {
            let (head, tail) = polygons.split_at_mut(1);
            if let Some(last) = tail.last_mut() {
                join(last, &mut head[0], tolerance);
            }
        }

        let segments: Vec<Segment> = polygons
            .iter()
            .filter_map(|p| Segment::from_points(&p.points))
            .collect();
        if closed {
            Path::closed_from_segments(&segments)
        } else {
            Path::from_segments(&segments)
        }
    }
}
