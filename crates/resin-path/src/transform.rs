//! Affine transform steps applied to paths.
//!
//! Steps run in order over every control point. Smooth quadratics are made
//! explicit first: their implied control point depends on the previous
//! command and would not survive a transform otherwise.

use tracing::trace;

use crate::arc::arc_to_cubics;
use crate::path::Path;
use crate::point::{Point, PointExt, Vector};
use crate::raw::{Cursor, RawSegment};
use crate::segment::Segment;

/// One step of a transform pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transform {
    /// Shift by a vector.
    Translate(Vector),
    /// Scale by `factor` per axis about `origin`.
    Scale { factor: Vector, origin: Point },
    /// Rotate by `angle` radians about `origin`.
    Rotate { angle: f64, origin: Point },
}

impl Transform {
    /// Translation by `offset`.
    pub fn translate(offset: Vector) -> Self {
        Transform::Translate(offset)
    }

    /// Scale about the coordinate origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Transform::Scale {
            factor: Vector::new(sx, sy),
            origin: Point::ZERO,
        }
    }

    /// Rotation about the coordinate origin.
    pub fn rotate(angle: f64) -> Self {
        Transform::Rotate {
            angle,
            origin: Point::ZERO,
        }
    }

    /// Maps a single point.
    pub fn apply(&self, p: Point) -> Point {
        match *self {
            Transform::Translate(offset) => p + offset,
            Transform::Scale { factor, origin } => origin + (p - origin) * factor,
            Transform::Rotate { angle, origin } => p.rotate_about(origin, angle),
        }
    }

    /// True if the step flips orientation.
    pub fn is_mirror(&self) -> bool {
        match *self {
            Transform::Scale { factor, .. } => factor.x * factor.y < 0.0,
            _ => false,
        }
    }

    /// Maps an arc command, or returns `None` when the transformed arc is
    /// no longer an axis-aligned ellipse in its own frame (non-uniform
    /// scale of a rotated arc).
    fn map_arc(
        &self,
        radii: Vector,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    ) -> Option<RawSegment> {
        let to = self.apply(to);
        match *self {
            Transform::Translate(_) => Some(RawSegment::Arc {
                radii,
                rotation,
                large_arc,
                sweep,
                to,
            }),
            Transform::Rotate { angle, .. } => Some(RawSegment::Arc {
                radii,
                rotation: rotation + angle.to_degrees(),
                large_arc,
                sweep,
                to,
            }),
            Transform::Scale { factor, .. } => {
                let (sx, sy) = (factor.x.abs(), factor.y.abs());
                let quarter_turns = rotation / 90.0;
                let radii = if sx == sy {
                    radii * sx
                } else if quarter_turns.fract() != 0.0 {
                    return None;
                } else if (quarter_turns as i64).rem_euclid(2) == 0 {
                    Vector::new(radii.x * sx, radii.y * sy)
                } else {
                    Vector::new(radii.x * sy, radii.y * sx)
                };
                let mirror = self.is_mirror();
                Some(RawSegment::Arc {
                    radii,
                    rotation: if mirror { -rotation } else { rotation },
                    large_arc,
                    sweep: sweep != mirror,
                    to,
                })
            }
        }
    }

    /// Applies this step to every command of `path`.
    fn apply_to_path(&self, path: &Path) -> Path {
        let start = path.start();
        let mut cursor = Cursor::new(start);
        let mut raw = Vec::with_capacity(path.raw().len());
        for r in path.raw() {
            let from = cursor.current;
            match cursor.advance(r) {
                RawSegment::Arc {
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                    to,
                } => match self.map_arc(radii, rotation, large_arc, sweep, to) {
                    Some(arc) => raw.push(arc),
                    None => {
                        trace!("arc expanded to cubics under non-uniform scale");
                        raw.extend(
                            arc_to_cubics(from, to, radii, rotation, large_arc, sweep)
                                .iter()
                                .map(|s| {
                                    RawSegment::from_segment(&s.map_points(|p| self.apply(p)))
                                }),
                        );
                    }
                },
                explicit => raw.push(explicit.map_points(|p| self.apply(p))),
            }
        }
        Path::new(self.apply(start), raw)
    }
}

impl Segment {
    /// Applies transform steps to the control points.
    pub fn transform(&self, steps: &[Transform]) -> Segment {
        self.map_points(|p| steps.iter().fold(p, |p, step| step.apply(p)))
    }
}

impl Path {
    /// Applies transform steps in order.
    ///
    /// # Example
    ///
    /// ```
    /// use rhizome_resin_path::{Point, Transform, Vector, rect};
    ///
    /// let moved = rect(Point::ZERO, Point::ONE)
    ///     .transform(&[Transform::scale(2.0, 2.0), Transform::translate(Vector::new(1.0, 0.0))]);
    /// assert_eq!(moved.start(), Point::new(1.0, 0.0));
    /// assert_eq!(moved.area(), 4.0);
    /// ```
    pub fn transform(&self, steps: &[Transform]) -> Path {
        steps
            .iter()
            .fold(self.clone(), |path, step| step.apply_to_path(&path))
    }

    /// Path shifted by `offset`.
    pub fn translate(&self, offset: Vector) -> Path {
        self.transform(&[Transform::translate(offset)])
    }

    /// Scales about the coordinate origin.
    pub fn scale(&self, sx: f64, sy: f64) -> Path {
        self.transform(&[Transform::scale(sx, sy)])
    }

    /// Rotates by `angle` radians about the coordinate origin.
    pub fn rotate(&self, angle: f64) -> Path {
        self.transform(&[Transform::rotate(angle)])
    }
}
