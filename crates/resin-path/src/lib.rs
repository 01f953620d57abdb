//! Vector path kernel for resin.
//!
//! Provides line, quadratic and cubic segments with exact or adaptive
//! geometry (length, projection, intersection, splitting), paths built from
//! raw commands with elliptical arcs, a strict text notation, parallel
//! offsetting and boolean clipping of closed path sets.
//!
//! Coordinates are `f64` ([`glam::DVec2`]). Numeric thresholds live in
//! [`Tolerance`]; every operation taking one has a `*_with` variant.
//!
//! # Example
//!
//! ```
//! use rhizome_resin_path::{Path, Point, circle, union};
//!
//! let a = Path::from_path_string("M 0,0 L 2,0 L 2,2 L 0,2 Z").unwrap();
//! let b = circle(Point::new(2.0, 1.0), 0.8);
//! let merged = union(&[a], &[b]).unwrap();
//! assert_eq!(merged.len(), 1);
//! assert!(merged[0].is_inside(Point::new(2.5, 1.0)));
//! ```

mod arc;
pub mod bezier;
mod boolean;
mod builder;
mod error;
mod line;
mod notation;
mod offset;
mod path;
mod point;
mod raw;
mod rect;
mod segment;
mod tolerance;
mod transform;

pub use arc::{ArcCenter, arc_to_cubics, endpoint_to_center};
pub use boolean::{BooleanOp, boolean, boolean_with, difference, divide, intersection, union, xor};
pub use builder::{
    PathBuilder,
    // Shapes
    circle,
    ellipse,
    line,
    polygon,
    polyline,
    rect,
};
pub use error::{PathError, PathResult};
pub use line::Line;
pub use notation::{NotationOptions, parse_path_set, path_set_string};
pub use path::{Path, PathIntersection, PathLocation, PathProjection};
pub use point::{Point, PointExt, Vector};
pub use raw::{RawSegment, resolve_smooth};
pub use rect::Rect;
pub use segment::{Intersection, Projection, Segment};
pub use tolerance::Tolerance;
pub use transform::Transform;
