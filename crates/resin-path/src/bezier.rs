//! Bezier curve utilities.
//!
//! Free functions for evaluating, differentiating, splitting and bounding
//! quadratic and cubic Bezier curves, plus the Gauss-Legendre quadrature used
//! for arc length.

use glam::DVec2;

use crate::rect::Rect;

/// Evaluates a quadratic Bezier curve at parameter `t`.
///
/// # Example
///
/// ```
/// use rhizome_resin_path::bezier::quadratic_point;
/// use glam::DVec2;
///
/// let mid = quadratic_point(DVec2::ZERO, DVec2::new(0.5, 1.0), DVec2::X, 0.5);
/// assert_eq!(mid, DVec2::new(0.5, 0.5));
/// ```
#[inline]
pub fn quadratic_point(p0: DVec2, p1: DVec2, p2: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t)
}

/// First derivative of a quadratic Bezier curve (unnormalized tangent).
#[inline]
pub fn quadratic_derivative(p0: DVec2, p1: DVec2, p2: DVec2, t: f64) -> DVec2 {
    (p1 - p0) * (2.0 * (1.0 - t)) + (p2 - p1) * (2.0 * t)
}

/// Second derivative of a quadratic Bezier curve (constant in `t`).
#[inline]
pub fn quadratic_second_derivative(p0: DVec2, p1: DVec2, p2: DVec2) -> DVec2 {
    (p2 - p1 * 2.0 + p0) * 2.0
}

/// Evaluates a cubic Bezier curve at parameter `t`.
///
/// # Example
///
/// ```
/// use rhizome_resin_path::bezier::cubic_point;
/// use glam::DVec2;
///
/// let p = cubic_point(
///     DVec2::ZERO,
///     DVec2::new(0.0, 1.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::X,
///     0.5,
/// );
/// assert_eq!(p, DVec2::new(0.5, 0.75));
/// ```
#[inline]
pub fn cubic_point(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    p0 * (mt2 * mt) + p1 * (3.0 * mt2 * t) + p2 * (3.0 * mt * t2) + p3 * (t2 * t)
}

/// First derivative of a cubic Bezier curve (unnormalized tangent).
#[inline]
pub fn cubic_derivative(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let mt = 1.0 - t;
    (p1 - p0) * (3.0 * mt * mt) + (p2 - p1) * (6.0 * mt * t) + (p3 - p2) * (3.0 * t * t)
}

/// Second derivative of a cubic Bezier curve.
#[inline]
pub fn cubic_second_derivative(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    (p2 - p1 * 2.0 + p0) * (6.0 * (1.0 - t)) + (p3 - p2 * 2.0 + p1) * (6.0 * t)
}

/// Splits a quadratic Bezier curve at `t` with de Casteljau's algorithm.
///
/// The shared point is the same value in both halves.
#[inline]
pub fn quadratic_split(p0: DVec2, p1: DVec2, p2: DVec2, t: f64) -> ([DVec2; 3], [DVec2; 3]) {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    let mid = a.lerp(b, t);
    ([p0, a, mid], [mid, b, p2])
}

/// Splits a cubic Bezier curve at `t` with de Casteljau's algorithm.
///
/// The shared point is the same value in both halves.
#[inline]
pub fn cubic_split(
    p0: DVec2,
    p1: DVec2,
    p2: DVec2,
    p3: DVec2,
    t: f64,
) -> ([DVec2; 4], [DVec2; 4]) {
    let a = p0.lerp(p1, t);
    let b = p1.lerp(p2, t);
    let c = p2.lerp(p3, t);
    let ab = a.lerp(b, t);
    let bc = b.lerp(c, t);
    let mid = ab.lerp(bc, t);
    ([p0, a, ab, mid], [mid, bc, c, p3])
}

/// Exact bounding box of a quadratic Bezier curve.
pub fn quadratic_bounds(p0: DVec2, p1: DVec2, p2: DVec2) -> Rect {
    let mut rect = Rect::new(p0, p2);
    for axis in 0..2 {
        // B'(t) = 0 is linear per axis.
        let denom = p0[axis] - 2.0 * p1[axis] + p2[axis];
        if denom.abs() > 1e-12 {
            let t = (p0[axis] - p1[axis]) / denom;
            if t > 0.0 && t < 1.0 {
                rect = rect.include(quadratic_point(p0, p1, p2, t));
            }
        }
    }
    rect
}

/// Exact bounding box of a cubic Bezier curve.
pub fn cubic_bounds(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2) -> Rect {
    let mut rect = Rect::new(p0, p3);
    for axis in 0..2 {
        // B'(t)/3 = a t^2 + b t + c per axis.
        let a = -p0[axis] + 3.0 * p1[axis] - 3.0 * p2[axis] + p3[axis];
        let b = 2.0 * (p0[axis] - 2.0 * p1[axis] + p2[axis]);
        let c = p1[axis] - p0[axis];
        for t in quadratic_roots(a, b, c).into_iter().flatten() {
            if t > 0.0 && t < 1.0 {
                rect = rect.include(cubic_point(p0, p1, p2, p3, t));
            }
        }
    }
    rect
}

/// Real roots of `a t^2 + b t + c`, degrading to the linear case.
pub(crate) fn quadratic_roots(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return [None, None];
        }
        return [Some(-c / b), None];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return [None, None];
    }
    let sqrt_d = disc.sqrt();
    // Avoids cancellation when b and sqrt_d are close.
    let q = -0.5 * (b + b.signum() * sqrt_d);
    if q.abs() < 1e-300 {
        return [Some(0.0), None];
    }
    [Some(q / a), Some(c / q)]
}

// ============================================================================
// Quadrature
// ============================================================================

const GAUSS_LEGENDRE_5: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664, 0.236_926_885_056_189_1),
    (0.906_179_845_938_664, 0.236_926_885_056_189_1),
];

const MAX_QUADRATURE_DEPTH: u32 = 16;

/// Five-point Gauss-Legendre estimate of the integral of `f` over `[a, b]`.
pub fn gauss_legendre<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> f64 {
    let half = 0.5 * (b - a);
    let center = 0.5 * (a + b);
    GAUSS_LEGENDRE_5
        .iter()
        .map(|&(x, w)| w * f(center + half * x))
        .sum::<f64>()
        * half
}

/// Adaptive Gauss-Legendre integration to an absolute tolerance.
///
/// An interval is split in half whenever the two halves disagree with the
/// whole by more than `tolerance`. Recursion depth is bounded, so a
/// pathological integrand yields the finest estimate reached rather than
/// looping.
pub fn integrate<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64, tolerance: f64) -> f64 {
    let whole = gauss_legendre(f, a, b);
    integrate_rec(f, a, b, whole, tolerance.max(1e-15), MAX_QUADRATURE_DEPTH)
}

fn integrate_rec<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    b: f64,
    whole: f64,
    tolerance: f64,
    depth: u32,
) -> f64 {
    let mid = 0.5 * (a + b);
    let left = gauss_legendre(f, a, mid);
    let right = gauss_legendre(f, mid, b);
    if depth == 0 || (left + right - whole).abs() <= tolerance {
        return left + right;
    }
    integrate_rec(f, a, mid, left, tolerance * 0.5, depth - 1)
        + integrate_rec(f, mid, b, right, tolerance * 0.5, depth - 1)
}
