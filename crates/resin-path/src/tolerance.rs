//! Numeric tolerances used across the kernel.
//!
//! None of these values carry correctness guarantees beyond "visually
//! acceptable" results at diagram scale; they are exposed so callers working
//! at very different scales can tune them.

/// Tolerances for projection, intersection, length and offset computations.
///
/// # Example
///
/// ```
/// use rhizome_resin_path::Tolerance;
///
/// let coarse = Tolerance::default().with_intersection(1e-2);
/// assert_eq!(coarse.intersection, 1e-2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance {
    /// Distance under which two points are considered coincident.
    pub point: f64,
    /// Parameter distance under which two `t` values are considered equal.
    pub param: f64,
    /// Relative accuracy of arc-length computations (fraction of curve length).
    pub length: f64,
    /// Flatness at which recursive bezier subdivision stops and the pieces
    /// are intersected as straight chords.
    pub intersection: f64,
    /// Sine of the angle under which adjacent offset edges are treated as
    /// parallel and keep their endpoints instead of being joined.
    pub join: f64,
    /// Enclosed area at or under which a closed loop counts as degenerate in
    /// boolean operations. Shapes smaller than this vanish from inputs and
    /// results.
    pub area: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            point: 1e-6,
            param: 1e-9,
            length: 1e-6,
            intersection: 1e-4,
            join: 1e-9,
            area: 1e-8,
        }
    }
}

impl Tolerance {
    /// Sets the point coincidence distance.
    pub fn with_point(mut self, point: f64) -> Self {
        self.point = point;
        self
    }

    /// Sets the parameter tolerance.
    pub fn with_param(mut self, param: f64) -> Self {
        self.param = param;
        self
    }

    /// Sets the relative arc-length accuracy.
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Sets the subdivision flatness for curve intersection.
    pub fn with_intersection(mut self, intersection: f64) -> Self {
        self.intersection = intersection;
        self
    }

    /// Sets the parallel threshold for offset joins.
    pub fn with_join(mut self, join: f64) -> Self {
        self.join = join;
        self
    }

    /// Sets the area under which boolean loops are discarded.
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }
}
