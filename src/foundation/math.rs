use kurbo::Point;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Shoelace area. Positive for counter-clockwise winding in a y-up frame,
/// which is clockwise on screen (y-down).
pub(crate) fn signed_area(poly: &[Point]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut a = 0.0;
    for i in 0..n {
        let p = poly[i];
        let q = poly[(i + 1) % n];
        a += p.x * q.y - p.y * q.x;
    }
    0.5 * a
}

/// Even-odd containment test. Points exactly on an edge may land either way.
pub(crate) fn point_in_polygon(pt: Point, poly: &[Point]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (poly[i], poly[j]);
        if (pi.y > pt.y) != (pj.y > pt.y) {
            let x_cross = (pj.x - pi.x) * (pt.y - pi.y) / (pj.y - pi.y) + pi.x;
            if pt.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

pub(crate) fn distance_to_segment(pt: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 <= f64::EPSILON {
        return (pt - a).hypot();
    }
    let t = ((pt - a).dot(ab) / len2).clamp(0.0, 1.0);
    (pt - (a + ab * t)).hypot()
}

/// Distance from `pt` to the closest edge of the closed polygon `poly`.
pub(crate) fn distance_to_boundary(pt: Point, poly: &[Point]) -> f64 {
    let n = poly.len();
    (0..n)
        .map(|i| distance_to_segment(pt, poly[i], poly[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Proper intersection of segments `a1-a2` and `b1-b2`.
///
/// Returns the parameters along both segments and the crossing point. Touching
/// endpoints and collinear overlaps are not reported.
pub(crate) fn segment_intersection(
    a1: Point,
    a2: Point,
    b1: Point,
    b2: Point,
) -> Option<(f64, f64, Point)> {
    let r = a2 - a1;
    let s = b2 - b1;
    let den = r.cross(s);
    if den.abs() < 1e-12 {
        return None;
    }
    let qp = b1 - a1;
    let t = qp.cross(s) / den;
    let u = qp.cross(r) / den;
    const EPS: f64 = 1e-9;
    if t <= EPS || t >= 1.0 - EPS || u <= EPS || u >= 1.0 - EPS {
        return None;
    }
    Some((t, u, a1 + r * t))
}

/// Intersection of the infinite lines through `a1-a2` and `b1-b2`.
pub(crate) fn line_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let r = a2 - a1;
    let s = b2 - b1;
    let den = r.cross(s);
    if den.abs() < 1e-12 {
        return None;
    }
    let t = (b1 - a1).cross(s) / den;
    Some(a1 + r * t)
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
