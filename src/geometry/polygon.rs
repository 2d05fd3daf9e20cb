use kurbo::{BezPath, Point, Rect};

use crate::{
    foundation::core::{Canvas, PctPoint},
    foundation::math::signed_area,
    geometry::offset::{PolygonOffset, RoundJoinOffset},
};

/// Map page-percentage points (0..=100) onto the logical canvas.
pub fn percent_to_logical(points: &[PctPoint], canvas: Canvas) -> Vec<Point> {
    let sx = canvas.width_f64() / 100.0;
    let sy = canvas.height_f64() / 100.0;
    points
        .iter()
        .map(|&PctPoint(x, y)| Point::new(x * sx, y * sy))
        .collect()
}

/// Shrink a closed polygon by `inset` using the default round-join offsetter.
///
/// Never fails: non-positive insets, fewer than three points, and collapsed results
/// all return `points` unchanged. When the shrink splits the polygon, the piece with
/// the greatest area wins.
pub fn inset_polygon(points: &[Point], inset: f64) -> Vec<Point> {
    inset_polygon_with(&RoundJoinOffset::default(), points, inset)
}

/// [`inset_polygon`] with an explicit offset backend.
#[tracing::instrument(level = "trace", skip(offsetter, points), fields(n = points.len()))]
pub fn inset_polygon_with<O: PolygonOffset + ?Sized>(
    offsetter: &O,
    points: &[Point],
    inset: f64,
) -> Vec<Point> {
    if inset.is_nan() || inset <= 0.0 || points.len() < 3 {
        return points.to_vec();
    }

    let best = offsetter
        .offset(points, -inset)
        .into_iter()
        .filter(|poly| poly.len() >= 3)
        .map(|poly| (signed_area(&poly).abs(), poly))
        .filter(|(area, _)| *area > 0.0)
        .max_by(|(a, _), (b, _)| a.total_cmp(b));

    match best {
        Some((_, poly)) => poly,
        None => {
            tracing::debug!(inset, "inset collapsed polygon, keeping outer outline");
            points.to_vec()
        }
    }
}

/// Arithmetic mean of the vertices.
///
/// This is not the area centroid; for strongly non-convex shapes it can drift
/// toward clusters of vertices.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Axis-aligned bounds of the vertices, `None` when empty.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .skip(1)
            .fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)),
    )
}

/// Closed outline through the polygon's vertices.
pub fn polygon_to_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut it = points.iter();
    if let Some(&first) = it.next() {
        path.move_to(first);
        for &p in it {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polygon.rs"]
mod tests;
