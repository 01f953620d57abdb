//! Elliptical arc to cubic Bezier conversion.
//!
//! Arcs use the endpoint parameterization of SVG path data (radii, x-axis
//! rotation in degrees, large-arc and sweep flags). The conversion to a
//! center parameterization follows the SVG implementation notes, including
//! the radius correction for radii too small to span the endpoints.

use std::f64::consts::{FRAC_PI_2, TAU};

use tracing::trace;

use crate::point::{Point, PointExt, Vector};
use crate::segment::Segment;

/// Center parameterization of an elliptical arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCenter {
    pub center: Point,
    /// Radii after out-of-range correction.
    pub radii: Vector,
    /// X-axis rotation in radians.
    pub rotation: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// Signed sweep in radians; positive sweeps toward increasing angles.
    pub sweep_angle: f64,
}

impl ArcCenter {
    /// Point on the ellipse at `angle`.
    pub fn point_at_angle(&self, angle: f64) -> Point {
        let local = Vector::new(self.radii.x * angle.cos(), self.radii.y * angle.sin());
        self.center + local.rotate_about(Vector::ZERO, self.rotation)
    }

    /// Derivative of [`ArcCenter::point_at_angle`] with respect to the angle.
    fn derivative_at_angle(&self, angle: f64) -> Vector {
        let local = Vector::new(-self.radii.x * angle.sin(), self.radii.y * angle.cos());
        local.rotate_about(Vector::ZERO, self.rotation)
    }
}

/// Converts an endpoint-parameterized arc to its center form.
///
/// Returns `None` for degenerate input: zero radius, coincident endpoints,
/// or non-finite values.
pub fn endpoint_to_center(
    start: Point,
    end: Point,
    radii: Vector,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
) -> Option<ArcCenter> {
    if !(start.is_finite() && end.is_finite() && radii.is_finite() && rotation_deg.is_finite()) {
        return None;
    }
    let mut rx = radii.x.abs();
    let mut ry = radii.y.abs();
    if rx == 0.0 || ry == 0.0 || start == end {
        return None;
    }

    let rotation = rotation_deg.to_radians();
    let (sin, cos) = rotation.sin_cos();
    let half = (start - end) * 0.5;
    let x1 = cos * half.x + sin * half.y;
    let y1 = -sin * half.x + cos * half.y;

    let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1 * y1 - ry2 * x1 * x1;
    let den = rx2 * y1 * y1 + ry2 * x1 * x1;
    if den == 0.0 {
        return None;
    }
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let coef = sign * (num / den).max(0.0).sqrt();
    let cx1 = coef * rx * y1 / ry;
    let cy1 = -coef * ry * x1 / rx;

    let mid = start.midpoint(end);
    let center = Point::new(cos * cx1 - sin * cy1 + mid.x, sin * cx1 + cos * cy1 + mid.y);

    let u = Vector::new((x1 - cx1) / rx, (y1 - cy1) / ry);
    let v = Vector::new((-x1 - cx1) / rx, (-y1 - cy1) / ry);
    let start_angle = u.y.atan2(u.x);
    let mut sweep_angle = u.cross(v).atan2(u.dot(v));
    if !sweep && sweep_angle > 0.0 {
        sweep_angle -= TAU;
    } else if sweep && sweep_angle < 0.0 {
        sweep_angle += TAU;
    }

    Some(ArcCenter {
        center,
        radii: Vector::new(rx, ry),
        rotation,
        start_angle,
        sweep_angle,
    })
}

/// Converts an elliptical arc into cubic segments, one per quarter turn of
/// sweep or less.
///
/// Degenerate arcs become a single line from `start` to `end`. The first
/// segment starts exactly at `start` and the last ends exactly at `end`.
///
/// # Example
///
/// ```
/// use rhizome_resin_path::{arc_to_cubics, Point, Vector};
///
/// let cubics = arc_to_cubics(
///     Point::new(1.0, 0.0),
///     Point::new(-1.0, 0.0),
///     Vector::new(1.0, 1.0),
///     0.0,
///     false,
///     true,
/// );
/// assert_eq!(cubics.len(), 2);
/// ```
pub fn arc_to_cubics(
    start: Point,
    end: Point,
    radii: Vector,
    rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
) -> Vec<Segment> {
    let Some(arc) = endpoint_to_center(start, end, radii, rotation_deg, large_arc, sweep) else {
        trace!(?start, ?end, ?radii, "degenerate arc replaced by line");
        return vec![Segment::line(start, end)];
    };

    let pieces = (arc.sweep_angle.abs() / FRAC_PI_2 - 1e-9).ceil().max(1.0) as usize;
    let step = arc.sweep_angle / pieces as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut cubics = Vec::with_capacity(pieces);
    let mut from = start;
    for i in 0..pieces {
        let a0 = arc.start_angle + step * i as f64;
        let a1 = a0 + step;
        let to = if i + 1 == pieces {
            end
        } else {
            arc.point_at_angle(a1)
        };
        let c1 = arc.point_at_angle(a0) + arc.derivative_at_angle(a0) * k;
        let c2 = arc.point_at_angle(a1) - arc.derivative_at_angle(a1) * k;
        cubics.push(Segment::cubic(from, c1, c2, to));
        from = to;
    }
    cubics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_circle_fidelity() {
        let cubics = arc_to_cubics(
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Vector::new(1.0, 1.0),
            0.0,
            false,
            true,
        );
        assert_eq!(cubics.len(), 1);
        for i in 0..=10 {
            let p = cubics[0].point_at(i as f64 / 10.0);
            assert!((p.length() - 1.0).abs() <= 0.003);
        }
    }

    #[test]
    fn test_center_of_quarter_arc() {
        let arc = endpoint_to_center(
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Vector::new(1.0, 1.0),
            0.0,
            false,
            true,
        )
        .unwrap();
        assert!(arc.center.approx_eq(Point::ZERO, 1e-12));
        assert!((arc.sweep_angle - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_large_arc_uses_other_center() {
        let arc = endpoint_to_center(
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Vector::new(1.0, 1.0),
            0.0,
            true,
            true,
        )
        .unwrap();
        assert!(arc.center.approx_eq(Point::new(1.0, 1.0), 1e-12));
        assert!((arc.sweep_angle - 3.0 * FRAC_PI_2).abs() < 1e-12);
        let cubics = arc_to_cubics(
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Vector::new(1.0, 1.0),
            0.0,
            true,
            true,
        );
        assert_eq!(cubics.len(), 3);
    }

    #[test]
    fn test_radius_correction() {
        // Radius too small to span the endpoints is scaled up to a half circle.
        let arc = endpoint_to_center(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Vector::new(1.0, 1.0),
            0.0,
            false,
            true,
        )
        .unwrap();
        assert!((arc.radii.x - 2.0).abs() < 1e-12);
        assert!(arc.center.approx_eq(Point::new(2.0, 0.0), 1e-9));
    }

    #[test]
    fn test_continuity_and_endpoints() {
        let start = Point::new(3.0, 7.0);
        let end = Point::new(-2.0, 1.5);
        let cubics = arc_to_cubics(start, end, Vector::new(5.0, 3.0), 30.0, true, false);
        assert_eq!(cubics[0].start(), start);
        assert_eq!(cubics.last().unwrap().end(), end);
        for pair in cubics.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn test_degenerate_arcs_become_lines() {
        let p = Point::new(1.0, 2.0);
        let q = Point::new(3.0, 4.0);
        assert_eq!(
            arc_to_cubics(p, q, Vector::new(0.0, 1.0), 0.0, false, false),
            vec![Segment::line(p, q)]
        );
        assert_eq!(
            arc_to_cubics(p, p, Vector::new(1.0, 1.0), 0.0, false, false),
            vec![Segment::line(p, p)]
        );
        assert_eq!(
            arc_to_cubics(p, q, Vector::new(f64::NAN, 1.0), 0.0, false, false),
            vec![Segment::line(p, q)]
        );
    }
}
