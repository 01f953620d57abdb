//! Point and vector primitives.
//!
//! Points and vectors share the [`DVec2`] representation; the aliases only
//! document intent. Arithmetic (add, subtract, scale, dot, length, normalize)
//! comes from glam, the remaining helpers live on [`PointExt`].

use glam::DVec2;

/// A position in the plane.
pub type Point = DVec2;

/// A displacement in the plane.
pub type Vector = DVec2;

/// Extra point/vector helpers not provided by glam.
pub trait PointExt: Copy {
    /// 2D cross product (z component of the 3D cross product).
    fn cross(self, other: Self) -> f64;

    /// Point halfway between `self` and `other`.
    fn midpoint(self, other: Self) -> Self;

    /// Rotates `self` around `center` by `angle` radians (counter-clockwise
    /// in a y-up frame).
    fn rotate_about(self, center: Self, angle: f64) -> Self;

    /// Component-wise equality within `eps`.
    fn approx_eq(self, other: Self, eps: f64) -> bool;

    /// Reflects `self` through `center`.
    fn reflect_through(self, center: Self) -> Self;
}

impl PointExt for DVec2 {
    #[inline]
    fn cross(self, other: Self) -> f64 {
        self.perp_dot(other)
    }

    #[inline]
    fn midpoint(self, other: Self) -> Self {
        (self + other) * 0.5
    }

    fn rotate_about(self, center: Self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let d = self - center;
        center + DVec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
    }

    #[inline]
    fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }

    #[inline]
    fn reflect_through(self, center: Self) -> Self {
        center * 2.0 - self
    }
}
