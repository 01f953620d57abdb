//! Benchmarks for path geometry and boolean operations.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rhizome_resin_path::{Path, PathBuilder, Point, Segment, circle, rect, union};

fn wavy_path(waves: usize) -> Path {
    (0..waves)
        .fold(PathBuilder::new(Point::ZERO), |b, i| {
            let x = i as f64 * 4.0;
            b.curve_to(
                Point::new(x + 1.0, 3.0),
                Point::new(x + 3.0, -3.0),
                Point::new(x + 4.0, 0.0),
            )
        })
        .build()
}

// ============================================================================
// Length
// ============================================================================

fn bench_cubic_length(c: &mut Criterion) {
    let seg = Segment::cubic(
        Point::ZERO,
        Point::new(1.0, 3.0),
        Point::new(3.0, -3.0),
        Point::new(4.0, 0.0),
    );
    c.bench_function("cubic_length", |b| b.iter(|| black_box(seg).length()));
}

fn bench_path_length(c: &mut Criterion) {
    let path = wavy_path(100);
    c.bench_function("path_length_100_cubics", |b| {
        b.iter(|| {
            // A fresh path each time so the memoized table is rebuilt.
            let fresh = Path::new(path.start(), path.raw().to_vec());
            black_box(fresh.length())
        })
    });
}

// ============================================================================
// Projection
// ============================================================================

fn bench_projection(c: &mut Criterion) {
    let path = wavy_path(100);
    c.bench_function("project_point_100_cubics", |b| {
        b.iter(|| black_box(path.project_point(black_box(Point::new(123.4, 1.7)))))
    });
}

// ============================================================================
// Intersection
// ============================================================================

fn bench_intersections(c: &mut Criterion) {
    let a = Segment::cubic(
        Point::ZERO,
        Point::new(1.0, 3.0),
        Point::new(3.0, -3.0),
        Point::new(4.0, 0.0),
    );
    let b = Segment::cubic(
        Point::new(0.0, 1.0),
        Point::new(2.0, -4.0),
        Point::new(3.0, 4.0),
        Point::new(4.0, -1.0),
    );
    c.bench_function("cubic_cubic_intersections", |bench| {
        bench.iter(|| black_box(a.intersections(black_box(&b))))
    });

    let p = wavy_path(20);
    let q = circle(Point::new(40.0, 0.0), 30.0);
    c.bench_function("path_path_intersections", |bench| {
        bench.iter(|| black_box(p.intersections(&q)))
    });
}

// ============================================================================
// Boolean
// ============================================================================

fn bench_boolean_union(c: &mut Criterion) {
    let squares = [rect(Point::ZERO, Point::ONE)];
    let shifted = [rect(Point::splat(0.5), Point::splat(1.5))];
    c.bench_function("union_rectangles", |b| {
        b.iter(|| black_box(union(&squares, &shifted)))
    });

    let a = [circle(Point::ZERO, 1.0)];
    let bc = [circle(Point::new(1.0, 0.3), 1.0)];
    c.bench_function("union_circles", |b| b.iter(|| black_box(union(&a, &bc))));
}

criterion_group!(
    benches,
    bench_cubic_length,
    bench_path_length,
    bench_projection,
    bench_intersections,
    bench_boolean_union,
);
criterion_main!(benches);
