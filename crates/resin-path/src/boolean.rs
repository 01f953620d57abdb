//! Boolean operations on closed path sets.
//!
//! Both inputs are sets of closed sub-paths. Every crossing between the two
//! boundaries becomes a shared vertex, the boundaries are cut into fragments
//! at those vertices, and each fragment is classified against the other
//! shape. An operation selects fragments by owner and classification and
//! traces the selected ones back into closed loops.
//!
//! Loops are oriented so the filled region lies to the left of the boundary
//! direction: outer loops have positive signed area and holes negative.
//!
//! # Example
//!
//! ```
//! use rhizome_resin_path::{Point, intersection, rect};
//!
//! let a = [rect(Point::ZERO, Point::ONE)];
//! let b = [rect(Point::splat(0.5), Point::splat(1.5))];
//! let overlap = intersection(&a, &b).unwrap();
//! assert_eq!(overlap.len(), 1);
//! assert!((overlap[0].area() - 0.25).abs() < 1e-9);
//! ```

use tracing::{debug, error, trace, warn};

use crate::error::{PathError, PathResult};
use crate::path::{Path, ray_crossings};
use crate::point::Point;
use crate::segment::Segment;
use crate::tolerance::Tolerance;

/// A boolean operation between shape `A` and shape `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BooleanOp {
    /// Region covered by either shape.
    Union,
    /// Region of `A` not covered by `B`.
    AMinusB,
    /// Region of `B` not covered by `A`.
    BMinusA,
    /// Region covered by both shapes.
    Intersection,
    /// Region covered by exactly one shape.
    Xor,
    /// The intersection, `A - B` and `B - A` regions as separate loops.
    Divide,
}

impl BooleanOp {
    /// The operations whose loops make up this one's result.
    fn parts(self) -> &'static [BooleanOp] {
        match self {
            BooleanOp::Union => &[BooleanOp::Union],
            BooleanOp::AMinusB => &[BooleanOp::AMinusB],
            BooleanOp::BMinusA => &[BooleanOp::BMinusA],
            BooleanOp::Intersection => &[BooleanOp::Intersection],
            BooleanOp::Xor => &[BooleanOp::AMinusB, BooleanOp::BMinusA],
            BooleanOp::Divide => &[
                BooleanOp::Intersection,
                BooleanOp::AMinusB,
                BooleanOp::BMinusA,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    A,
    B,
}

/// Where a fragment lies relative to the other shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Inside,
    Outside,
    /// On the other boundary, running the same way.
    OnSame,
    /// On the other boundary, running the opposite way.
    OnOpposite,
}

/// Whether `op` keeps a fragment, and if so whether it is reversed.
fn select(op: BooleanOp, owner: Owner, location: Location) -> Option<bool> {
    use Location::*;
    let keep = match (op, owner) {
        (BooleanOp::Union, Owner::A) => matches!(location, Outside | OnSame),
        (BooleanOp::Union, Owner::B) => location == Outside,
        (BooleanOp::Intersection, Owner::A) => matches!(location, Inside | OnSame),
        (BooleanOp::Intersection, Owner::B) => location == Inside,
        (BooleanOp::AMinusB, Owner::A) | (BooleanOp::BMinusA, Owner::B) => {
            matches!(location, Outside | OnOpposite)
        }
        (BooleanOp::AMinusB, Owner::B) | (BooleanOp::BMinusA, Owner::A) => {
            return (location == Inside).then_some(true);
        }
        (BooleanOp::Xor | BooleanOp::Divide, _) => false,
    };
    keep.then_some(false)
}

/// A piece of boundary between two shared vertices.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    segment: Segment,
    owner: Owner,
    from: usize,
    to: usize,
    location: Location,
}

/// An oriented fragment selected for tracing.
#[derive(Debug, Clone, Copy)]
struct Edge {
    segment: Segment,
    owner: Owner,
    from: usize,
    to: usize,
}

/// Both boundaries cut at their crossings, with classified fragments.
#[derive(Debug)]
struct Arrangement {
    vertices: Vec<Point>,
    fragments: Vec<Fragment>,
}

/// Closes every path, drops degenerate ones and orients the rest.
///
/// Loops nested at an even depth inside the other loops of the same set are
/// outer boundaries and get positive signed area; odd depths are holes.
fn normalize(paths: &[Path], tolerance: &Tolerance) -> Vec<Vec<Segment>> {
    let loops: Vec<(Vec<Segment>, f64)> = paths
        .iter()
        .filter_map(|path| {
            let closed = path.close();
            let segments: Vec<Segment> = closed
                .segments()
                .iter()
                .filter(|s| !s.is_degenerate_with(tolerance))
                .copied()
                .collect();
            let area = closed.signed_area();
            if segments.is_empty() || area.abs() <= tolerance.area {
                trace!(?area, "degenerate sub-path dropped");
                return None;
            }
            Some((segments, area))
        })
        .collect();

    loops
        .iter()
        .enumerate()
        .map(|(i, (segments, area))| {
            let sample = segments[0].point_at(0.5);
            let depth = loops
                .iter()
                .enumerate()
                .filter(|&(j, (other, _))| {
                    j != i && ray_crossings(other, sample, tolerance) % 2 == 1
                })
                .count();
            let want_positive = depth % 2 == 0;
            if (*area > 0.0) == want_positive {
                segments.clone()
            } else {
                segments.iter().rev().map(Segment::reverse).collect()
            }
        })
        .collect()
}

fn near_end(segment: &Segment, p: Point, distance: f64) -> bool {
    segment.start().distance(p) <= distance || segment.end().distance(p) <= distance
}

/// `segment` with its endpoints moved to `start` and `end`.
fn snap(segment: Segment, start: Point, end: Point) -> Segment {
    match segment {
        Segment::Line { .. } => Segment::Line { start, end },
        Segment::Quadratic { control, .. } => Segment::Quadratic {
            start,
            control,
            end,
        },
        Segment::Cubic {
            control1, control2, ..
        } => Segment::Cubic {
            start,
            control1,
            control2,
            end,
        },
    }
}

/// Cuts `segment` at the given `(t, point)` positions.
fn cut(segment: &Segment, mut cuts: Vec<(f64, Point)>, tolerance: &Tolerance) -> Vec<Segment> {
    cuts.sort_by(|x, y| x.0.total_cmp(&y.0));
    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let (mut t0, mut p0) = (0.0, segment.start());
    for (t, p) in cuts {
        if t - t0 <= tolerance.param || 1.0 - t <= tolerance.param {
            continue;
        }
        pieces.push(snap(segment.subsegment(t0, t), p0, p));
        t0 = t;
        p0 = p;
    }
    pieces.push(snap(segment.subsegment(t0, 1.0), p0, segment.end()));
    pieces
}

/// Vertex positions merged within a distance.
struct Vertices {
    points: Vec<Point>,
    merge: f64,
}

impl Vertices {
    fn id(&mut self, p: Point) -> usize {
        if let Some(i) = self.points.iter().position(|q| q.distance(p) <= self.merge) {
            return i;
        }
        self.points.push(p);
        self.points.len() - 1
    }
}

/// Classifies a fragment against the boundary `other`.
fn classify(segment: &Segment, other: &[Segment], tolerance: &Tolerance) -> Location {
    let mid = segment.point_at(0.5);
    let on_boundary = tolerance.intersection.max(tolerance.point);
    let closest = other
        .iter()
        .map(|s| (s, s.project_point(mid)))
        .min_by(|x, y| x.1.distance.total_cmp(&y.1.distance));
    if let Some((owner, proj)) = closest {
        if proj.distance <= on_boundary {
            let along = segment.direction_at(0.5).dot(owner.direction_at(proj.t));
            return if along > 0.0 {
                Location::OnSame
            } else {
                Location::OnOpposite
            };
        }
    }
    if ray_crossings(other, mid, tolerance) % 2 == 1 {
        Location::Inside
    } else {
        Location::Outside
    }
}

impl Arrangement {
    fn build(a: &[Segment], b: &[Segment], tolerance: &Tolerance) -> Self {
        let merge = tolerance.intersection.max(tolerance.point);
        let mut cuts_a: Vec<Vec<(f64, Point)>> = vec![Vec::new(); a.len()];
        let mut cuts_b: Vec<Vec<(f64, Point)>> = vec![Vec::new(); b.len()];
        let mut crossings = 0usize;
        for (i, sa) in a.iter().enumerate() {
            let bounds = sa.bounds();
            for (j, sb) in b.iter().enumerate() {
                if !bounds.overlaps(&sb.bounds(), merge) {
                    continue;
                }
                for hit in sa.intersections_with(sb, tolerance) {
                    crossings += 1;
                    if !near_end(sa, hit.point, merge) {
                        cuts_a[i].push((hit.t1, hit.point));
                    }
                    if !near_end(sb, hit.point, merge) {
                        cuts_b[j].push((hit.t2, hit.point));
                    }
                }
            }
        }

        let mut vertices = Vertices {
            points: Vec::new(),
            merge,
        };
        let mut fragments = Vec::new();
        let sides = [(a, cuts_a, Owner::A, b), (b, cuts_b, Owner::B, a)];
        for (segments, cuts, owner, other) in sides {
            for (segment, cuts) in segments.iter().zip(cuts) {
                for piece in cut(segment, cuts, tolerance) {
                    let from = vertices.id(piece.start());
                    let to = vertices.id(piece.end());
                    let piece = snap(piece, vertices.points[from], vertices.points[to]);
                    if from == to && piece.length() <= merge {
                        continue;
                    }
                    fragments.push(Fragment {
                        segment: piece,
                        owner,
                        from,
                        to,
                        location: classify(&piece, other, tolerance),
                    });
                }
            }
        }

        debug!(
            crossings,
            vertices = vertices.points.len(),
            fragments = fragments.len(),
            "boolean arrangement built"
        );
        Self {
            vertices: vertices.points,
            fragments,
        }
    }

    /// Selected fragments of `op`, oriented for tracing.
    fn edges(&self, op: BooleanOp) -> Vec<Edge> {
        self.fragments
            .iter()
            .filter_map(|f| {
                let reversed = select(op, f.owner, f.location)?;
                Some(if reversed {
                    Edge {
                        segment: f.segment.reverse(),
                        owner: f.owner,
                        from: f.to,
                        to: f.from,
                    }
                } else {
                    Edge {
                        segment: f.segment,
                        owner: f.owner,
                        from: f.from,
                        to: f.to,
                    }
                })
            })
            .collect()
    }

    /// Traces the selected edges of `op` into closed loops.
    fn trace(&self, op: BooleanOp, tolerance: &Tolerance) -> PathResult<Vec<Path>> {
        let edges = self.edges(op);
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); self.vertices.len()];
        for (i, e) in edges.iter().enumerate() {
            outgoing[e.from].push(i);
        }

        let mut used = vec![false; edges.len()];
        let mut loops = Vec::new();
        for first in 0..edges.len() {
            if used[first] {
                continue;
            }
            used[first] = true;
            let origin = edges[first].from;
            let mut segments = vec![edges[first].segment];
            let (mut at, mut owner) = (edges[first].to, edges[first].owner);
            let mut steps = 0;
            while at != origin {
                steps += 1;
                if steps > edges.len() {
                    error!(?op, steps, "boolean walk did not terminate");
                    return Err(PathError::InvariantViolated(
                        "boolean walk exceeded the fragment count",
                    ));
                }
                let candidates = outgoing[at].iter().copied().filter(|&i| !used[i]);
                let next = candidates
                    .clone()
                    .find(|&i| edges[i].owner != owner)
                    .or_else(|| candidates.clone().next());
                let Some(next) = next else {
                    warn!(
                        ?op,
                        vertex = ?self.vertices[at],
                        "boolean walk hit a dead end, closing loop"
                    );
                    break;
                };
                used[next] = true;
                segments.push(edges[next].segment);
                at = edges[next].to;
                owner = edges[next].owner;
            }

            let path = Path::closed_from_segments(&segments);
            if path.area() > tolerance.area {
                loops.push(path);
            } else {
                trace!(?op, "sliver loop dropped");
            }
        }
        Ok(loops)
    }
}

/// Applies `op` to the path sets `a` and `b` with default tolerances.
pub fn boolean(a: &[Path], b: &[Path], op: BooleanOp) -> PathResult<Vec<Path>> {
    boolean_with(a, b, op, &Tolerance::default())
}

/// Applies `op` with explicit tolerances.
pub fn boolean_with(
    a: &[Path],
    b: &[Path],
    op: BooleanOp,
    tolerance: &Tolerance,
) -> PathResult<Vec<Path>> {
    let a = normalize(a, tolerance).concat();
    let b = normalize(b, tolerance).concat();
    let arrangement = Arrangement::build(&a, &b, tolerance);
    let mut result = Vec::new();
    for &part in op.parts() {
        result.extend(arrangement.trace(part, tolerance)?);
    }
    debug!(?op, loops = result.len(), "boolean operation finished");
    Ok(result)
}

/// Region covered by either set.
pub fn union(a: &[Path], b: &[Path]) -> PathResult<Vec<Path>> {
    boolean(a, b, BooleanOp::Union)
}

/// Region covered by both sets.
pub fn intersection(a: &[Path], b: &[Path]) -> PathResult<Vec<Path>> {
    boolean(a, b, BooleanOp::Intersection)
}

/// Region of `a` not covered by `b`.
pub fn difference(a: &[Path], b: &[Path]) -> PathResult<Vec<Path>> {
    boolean(a, b, BooleanOp::AMinusB)
}

/// Region covered by exactly one set.
pub fn xor(a: &[Path], b: &[Path]) -> PathResult<Vec<Path>> {
    boolean(a, b, BooleanOp::Xor)
}

/// Intersection, `a - b` and `b - a` as separate loops.
pub fn divide(a: &[Path], b: &[Path]) -> PathResult<Vec<Path>> {
    boolean(a, b, BooleanOp::Divide)
}
