//! Closed-polygon offsetting with rounded joins.
//!
//! Callers go through [`PolygonOffset`] so the algorithm can be swapped without
//! touching geometry or rendering code. The default [`RoundJoinOffset`] builds the
//! raw offset curve (mitred where the offset lines meet, arcs where they diverge),
//! splits it at self-intersections, and keeps the loops that are correctly wound
//! and sit at least `|distance|` away from the source boundary.

use std::f64::consts::PI;

use kurbo::{Point, Vec2};

use crate::foundation::math::{
    distance_to_boundary, line_intersection, point_in_polygon, segment_intersection, signed_area,
};

/// Polygon offsetting backend.
pub trait PolygonOffset {
    /// Offset a closed polygon by `distance`: negative shrinks, positive grows.
    ///
    /// Returns every resulting closed polygon (possibly none). Output loops carry the
    /// same winding as the input.
    fn offset(&self, polygon: &[Point], distance: f64) -> Vec<Vec<Point>>;
}

/// Offset with round joins and chordal arc approximation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundJoinOffset {
    /// Maximum distance between an arc and the chords approximating it, in logical px.
    pub arc_tolerance: f64,
}

impl Default for RoundJoinOffset {
    fn default() -> Self {
        Self {
            arc_tolerance: 0.25,
        }
    }
}

const MAX_ARC_STEPS: usize = 256;
const MAX_SPLITS: usize = 4096;
const COLLINEAR_SIN: f64 = 1e-9;

impl RoundJoinOffset {
    pub fn new(arc_tolerance: f64) -> Self {
        Self { arc_tolerance }
    }

    fn effective_tolerance(&self, radius: f64) -> f64 {
        let tol = if self.arc_tolerance.is_finite() && self.arc_tolerance > 0.0 {
            self.arc_tolerance
        } else {
            Self::default().arc_tolerance
        };
        tol.min(radius * 0.25)
    }

    /// Chord count for a full turn at `radius`.
    fn steps_per_turn(&self, radius: f64) -> f64 {
        let tol = self.effective_tolerance(radius);
        let cos_half = (1.0 - tol / radius).clamp(-1.0, 1.0);
        let half = cos_half.acos();
        if half <= f64::EPSILON {
            return MAX_ARC_STEPS as f64;
        }
        (PI / half).clamp(4.0, MAX_ARC_STEPS as f64)
    }

    fn raw_curve(&self, ring: &[Point], delta: f64) -> Vec<Point> {
        let n = ring.len();
        let radius = delta.abs();
        let steps_per_turn = self.steps_per_turn(radius);

        let normals: Vec<Vec2> = (0..n)
            .map(|i| outward_normal(ring[i], ring[(i + 1) % n]))
            .collect();

        let mut out = Vec::with_capacity(n * 4);
        for i in 0..n {
            let prev = (i + n - 1) % n;
            let p = ring[i];
            let n0 = normals[prev];
            let n1 = normals[i];
            let e0 = ring[i] - ring[prev];
            let e1 = ring[(i + 1) % n] - ring[i];

            let a = p + n0 * delta;
            let b = p + n1 * delta;

            let sin = n0.cross(n1);
            let cos = n0.dot(n1);
            if sin.abs() < COLLINEAR_SIN && cos > 0.0 {
                out.push(b);
                continue;
            }

            // Offset lines meet when shrinking a convex corner or growing a reflex one.
            let convex = e0.cross(e1) > 0.0;
            if convex == (delta < 0.0) {
                if cos > -1.0 + 1e-9
                    && let Some(m) = line_intersection(a, a + e0, b, b + e1)
                {
                    out.push(m);
                } else {
                    out.push(a);
                    out.push(b);
                }
                continue;
            }

            let start = (a - p).atan2();
            let sweep = wrap_angle((b - p).atan2() - start);
            let steps = ((sweep.abs() / (2.0 * PI)) * steps_per_turn).ceil() as usize;
            let steps = steps.clamp(1, MAX_ARC_STEPS);
            out.push(a);
            for s in 1..steps {
                let t = s as f64 / steps as f64;
                out.push(p + Vec2::from_angle(start + sweep * t) * radius);
            }
            out.push(b);
        }
        dedup_ring(out)
    }

    fn loop_is_valid(&self, candidate: &[Point], source: &[Point], delta: f64) -> bool {
        if candidate.len() < 3 || signed_area(candidate) <= 1e-9 {
            return false;
        }
        let radius = delta.abs();
        let min_dist = radius - self.effective_tolerance(radius) - 1e-6;
        let shrinking = delta < 0.0;
        let n = candidate.len();
        (0..n).all(|i| {
            let p = candidate[i];
            let mid = p.midpoint(candidate[(i + 1) % n]);
            [p, mid].into_iter().all(|q| {
                distance_to_boundary(q, source) >= min_dist
                    && point_in_polygon(q, source) == shrinking
            })
        })
    }
}

impl PolygonOffset for RoundJoinOffset {
    fn offset(&self, polygon: &[Point], distance: f64) -> Vec<Vec<Point>> {
        let mut ring = dedup_ring(polygon.to_vec());
        if ring.len() < 3 || !distance.is_finite() {
            return Vec::new();
        }
        let area = signed_area(&ring);
        if area.abs() <= 1e-9 {
            return Vec::new();
        }
        if distance == 0.0 {
            return vec![polygon.to_vec()];
        }
        let reversed = area < 0.0;
        if reversed {
            ring.reverse();
        }

        let raw = self.raw_curve(&ring, distance);
        let mut loops = Vec::new();
        let mut budget = MAX_SPLITS;
        split_self_intersections(raw, &mut loops, &mut budget);

        loops
            .into_iter()
            .filter(|l| self.loop_is_valid(l, &ring, distance))
            .map(|mut l| {
                if reversed {
                    l.reverse();
                }
                l
            })
            .collect()
    }
}

/// Outward unit normal of edge `a -> b` for a positively wound ring.
fn outward_normal(a: Point, b: Point) -> Vec2 {
    let e = b - a;
    let len = e.hypot();
    if len <= f64::EPSILON {
        return Vec2::ZERO;
    }
    Vec2::new(e.y / len, -e.x / len)
}

fn wrap_angle(mut a: f64) -> f64 {
    while a <= -PI {
        a += 2.0 * PI;
    }
    while a > PI {
        a -= 2.0 * PI;
    }
    a
}

/// Drop repeated consecutive points, including a closing duplicate of the first point.
pub(crate) fn dedup_ring(mut pts: Vec<Point>) -> Vec<Point> {
    const EPS2: f64 = 1e-18;
    pts.dedup_by(|b, a| (*b - *a).hypot2() <= EPS2);
    while pts.len() > 1 {
        let (first, last) = (pts[0], pts[pts.len() - 1]);
        if (last - first).hypot2() <= EPS2 {
            pts.pop();
        } else {
            break;
        }
    }
    pts
}

/// Split a closed polyline at its first self-crossing, recursively, until every
/// emitted loop is simple.
fn split_self_intersections(ring: Vec<Point>, out: &mut Vec<Vec<Point>>, budget: &mut usize) {
    let n = ring.len();
    if n < 3 {
        return;
    }
    if *budget == 0 {
        out.push(ring);
        return;
    }
    for i in 0..n {
        let a1 = ring[i];
        let a2 = ring[(i + 1) % n];
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let b1 = ring[j];
            let b2 = ring[(j + 1) % n];
            let Some((_, _, x)) = segment_intersection(a1, a2, b1, b2) else {
                continue;
            };
            *budget -= 1;

            let mut inner = Vec::with_capacity(j - i + 1);
            inner.push(x);
            inner.extend_from_slice(&ring[i + 1..=j]);

            let mut outer = Vec::with_capacity(n - (j - i) + 1);
            outer.push(x);
            outer.extend_from_slice(&ring[j + 1..]);
            outer.extend_from_slice(&ring[..=i]);

            split_self_intersections(dedup_ring(inner), out, budget);
            split_self_intersections(dedup_ring(outer), out, budget);
            return;
        }
    }
    out.push(ring);
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/offset.rs"]
mod tests;
