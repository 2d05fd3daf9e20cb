use super::*;

fn square(size: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(size, 0.0),
        Point::new(size, size),
        Point::new(0.0, size),
    ]
}

#[test]
fn fnv_hash_is_stable_across_chunking() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"panel");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"pa");
    b.write_bytes(b"nel");
    assert_eq!(a.finish(), b.finish());
    assert_ne!(a.finish(), Fnv1a64::OFFSET_BASIS);
}

#[test]
fn signed_area_flips_with_winding() {
    let sq = square(10.0);
    assert_eq!(signed_area(&sq), 100.0);
    let rev: Vec<Point> = sq.iter().rev().copied().collect();
    assert_eq!(signed_area(&rev), -100.0);
    assert_eq!(signed_area(&sq[..2]), 0.0);
}

#[test]
fn point_in_polygon_basic() {
    let sq = square(10.0);
    assert!(point_in_polygon(Point::new(5.0, 5.0), &sq));
    assert!(!point_in_polygon(Point::new(15.0, 5.0), &sq));
    assert!(!point_in_polygon(Point::new(5.0, -1.0), &sq));
}

#[test]
fn distance_to_boundary_of_square() {
    let sq = square(10.0);
    assert!((distance_to_boundary(Point::new(5.0, 5.0), &sq) - 5.0).abs() < 1e-12);
    assert!((distance_to_boundary(Point::new(2.0, 7.0), &sq) - 2.0).abs() < 1e-12);
    assert!((distance_to_segment(Point::new(-3.0, 4.0), Point::ZERO, Point::ZERO) - 5.0).abs() < 1e-12);
}

#[test]
fn segments_cross_only_in_interior() {
    let hit = segment_intersection(
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
        Point::new(10.0, 0.0),
    );
    let (t, u, p) = hit.unwrap();
    assert!((t - 0.5).abs() < 1e-12 && (u - 0.5).abs() < 1e-12);
    assert!((p - Point::new(5.0, 5.0)).hypot() < 1e-12);

    // Shared endpoint is not a crossing.
    assert!(
        segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        )
        .is_none()
    );
}

#[test]
fn parallel_lines_do_not_meet() {
    assert!(
        line_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        )
        .is_none()
    );
    let p = line_intersection(
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(3.0, -1.0),
        Point::new(3.0, 1.0),
    )
    .unwrap();
    assert!((p - Point::new(3.0, 0.0)).hypot() < 1e-12);
}
