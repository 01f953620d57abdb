//! Boolean operations on rectangles, circles and parsed path sets.

use rhizome_resin_path::{
    BooleanOp, Path, Point, Segment, Tolerance, boolean, boolean_with, circle, difference,
    intersection, parse_path_set, rect, union, xor,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn area(paths: &[Path]) -> f64 {
    paths.iter().map(Path::signed_area).sum()
}

fn rectangles() -> Vec<(Vec<Path>, Vec<Path>)> {
    vec![
        (
            vec![rect(Point::ZERO, Point::ONE)],
            vec![rect(Point::splat(0.5), Point::splat(1.5))],
        ),
        (
            vec![rect(Point::ZERO, Point::new(4.0, 1.0))],
            vec![rect(Point::new(1.0, -1.0), Point::new(2.0, 3.0))],
        ),
        (
            vec![rect(Point::new(-2.0, -2.0), Point::new(2.0, 2.0))],
            vec![rect(Point::new(1.0, 1.0), Point::new(5.0, 3.0))],
        ),
    ]
}

#[test]
fn unit_squares() {
    init_tracing();
    let a = [rect(Point::ZERO, Point::ONE)];
    let b = [rect(Point::splat(0.5), Point::splat(1.5))];
    assert!((area(&intersection(&a, &b).unwrap()) - 0.25).abs() < 1e-9);
    assert!((area(&union(&a, &b).unwrap()) - 1.75).abs() < 1e-9);
    assert!((area(&difference(&a, &b).unwrap()) - 0.75).abs() < 1e-9);
}

#[test]
fn inclusion_exclusion() {
    init_tracing();
    for (a, b) in rectangles() {
        let both = area(&intersection(&a, &b).unwrap());
        let either = area(&union(&a, &b).unwrap());
        assert!((area(&a) + area(&b) - either - both).abs() < 1e-9);
        let a_only = area(&difference(&a, &b).unwrap());
        assert!((a_only - (area(&a) - both)).abs() < 1e-9);
    }
}

#[test]
fn union_commutes() {
    for (a, b) in rectangles() {
        let ab = area(&union(&a, &b).unwrap());
        let ba = area(&union(&b, &a).unwrap());
        assert!((ab - ba).abs() < 1e-9);
    }
}

#[test]
fn xor_is_union_minus_intersection() {
    for (a, b) in rectangles() {
        let x = area(&xor(&a, &b).unwrap());
        let expected = area(&union(&a, &b).unwrap()) - area(&intersection(&a, &b).unwrap());
        assert!((x - expected).abs() < 1e-9);
    }
}

#[test]
fn cross_shape_union_is_single_loop() {
    let (a, b) = rectangles().remove(1);
    let result = union(&a, &b).unwrap();
    assert_eq!(result.len(), 1);
    assert!((result[0].area() - 7.0).abs() < 1e-9);
    assert_eq!(result[0].segments().len(), 12);

    // The vertical bar cuts the horizontal one in two.
    let cut = difference(&a, &b).unwrap();
    assert_eq!(cut.len(), 2);
}

#[test]
fn divide_partitions_the_union() {
    for (a, b) in rectangles() {
        let parts = boolean(&a, &b, BooleanOp::Divide).unwrap();
        let either = area(&union(&a, &b).unwrap());
        assert!((area(&parts) - either).abs() < 1e-9);
        assert!(parts.iter().all(|p| p.signed_area() > 0.0));
    }
}

#[test]
fn circle_minus_square_keeps_curves() {
    init_tracing();
    let a = [circle(Point::ZERO, 2.0)];
    let b = [rect(Point::ZERO, Point::splat(3.0))];
    let result = difference(&a, &b).unwrap();
    assert_eq!(result.len(), 1);
    let expected = a[0].area() * 0.75;
    assert!((result[0].area() - expected).abs() < 1e-6, "{}", result[0].area());
    assert!(result[0].is_inside(Point::new(-1.0, -1.0)));
    assert!(!result[0].is_inside(Point::new(1.0, 1.0)));
}

#[test]
fn parsed_set_with_hole() {
    let ring = parse_path_set("M 0,0 L 6,0 L 6,6 L 0,6 Z M 2,2 L 4,2 L 4,4 L 2,4 Z").unwrap();
    let bar = [rect(Point::new(-1.0, 2.5), Point::new(7.0, 3.5))];
    let inside = intersection(&ring, &bar).unwrap();
    // The bar crosses the ring twice, either side of the hole.
    assert_eq!(inside.len(), 2);
    assert!((area(&inside) - 4.0).abs() < 1e-9);
}

#[test]
fn coarse_tolerance_still_terminates() {
    let a = [circle(Point::ZERO, 1.0)];
    let b = [circle(Point::new(0.9, 0.1), 1.0)];
    let tol = Tolerance::default().with_intersection(1e-2).with_point(1e-3);
    let result = boolean_with(&a, &b, BooleanOp::Union, &tol).unwrap();
    assert!(!result.is_empty());
}

#[test]
fn identical_large_circles() {
    init_tracing();
    for radius in [1e3, 5e3, 1e5] {
        let c = circle(Point::new(radius, -radius), radius);
        let first = c.segments()[0];
        assert_eq!(first.intersections(&first).len(), 2);
        assert!(c.intersections(&c).len() <= 8);

        let merged = union(&[c.clone()], &[c.clone()]).unwrap();
        assert_eq!(merged.len(), 1);
        assert!((merged[0].area() - c.area()).abs() < 1e-9 * c.area());
        assert_eq!(merged[0].segments().len(), 4);

        assert!(difference(&[c.clone()], &[c.clone()]).unwrap().is_empty());
    }
}

#[test]
fn partially_coincident_large_circles() {
    init_tracing();
    let radius = 2e3;
    let c = circle(Point::ZERO, radius);
    let arcs = c.segments();
    // Upper half disc sharing two quarter arcs with the circle.
    let half = Path::from_segments(&[
        arcs[0],
        arcs[1],
        Segment::line(arcs[1].end(), arcs[0].start()),
    ])
    .close();

    let merged = union(&[c.clone()], &[half.clone()]).unwrap();
    assert_eq!(merged.len(), 1);
    assert!((merged[0].area() - c.area()).abs() < 1e-9 * c.area());

    let lower = difference(&[c.clone()], &[half.clone()]).unwrap();
    assert_eq!(lower.len(), 1);
    assert_eq!(lower[0].segments().len(), 3);
    assert!((lower[0].area() - 0.5 * c.area()).abs() < 1e-9 * c.area());
    assert!(lower[0].is_inside(Point::new(0.0, -radius * 0.5)));

    let upper = intersection(&[c], &[half.clone()]).unwrap();
    assert_eq!(upper.len(), 1);
    assert!((upper[0].area() - half.area()).abs() < 1e-9 * half.area());
}

#[test]
fn tiny_squares_survive_fine_tolerance() {
    let tol = Tolerance::default()
        .with_point(1e-9)
        .with_intersection(1e-9)
        .with_area(1e-14);
    let a = [rect(Point::ZERO, Point::splat(5e-5))];
    let b = [rect(Point::ONE, Point::splat(1.00005))];

    let both = boolean_with(&a, &b, BooleanOp::Union, &tol).unwrap();
    assert_eq!(both.len(), 2);
    assert!((area(&both) - 5e-9).abs() < 1e-13);

    let alone = boolean_with(&a, &[], BooleanOp::AMinusB, &tol).unwrap();
    assert_eq!(alone.len(), 1);

    let shifted = [rect(Point::splat(2.5e-5), Point::splat(7.5e-5))];
    let overlap = boolean_with(&a, &shifted, BooleanOp::Intersection, &tol).unwrap();
    assert_eq!(overlap.len(), 1);
    assert!((overlap[0].area() - 6.25e-10).abs() < 1e-15);

    // The area cutoff is what decides whether such shapes count.
    let coarse = tol.with_area(1e-8);
    assert!(boolean_with(&a, &b, BooleanOp::Union, &coarse).unwrap().is_empty());
}
