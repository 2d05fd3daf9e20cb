use kurbo::{BezPath, Point, Rect, RoundedRect, Shape};

use crate::foundation::color::ColorDef;

/// Panel number badge drawn at each panel centroid, in logical units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub size: f64,
    pub corner_radius: f64,
    pub fill: ColorDef,
    pub ink: ColorDef,
    pub font_size: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            size: 20.0,
            corner_radius: 4.0,
            fill: ColorDef::rgba(0.0, 0.0, 0.0, 0.6),
            ink: ColorDef::WHITE,
            font_size: 12.0,
        }
    }
}

/// Badge outline and number glyphs for one marker.
#[derive(Clone, Debug)]
pub struct MarkerShape {
    pub badge: BezPath,
    pub digits: BezPath,
}

const TOLERANCE: f64 = 0.05;

// Segment bits: a b c d e f g (top, upper right, lower right, bottom, lower left,
// upper left, middle).
const SEGMENTS: [u8; 10] = [
    0b111_1110, 0b011_0000, 0b110_1101, 0b111_1001, 0b011_0011, 0b101_1011, 0b101_1111,
    0b111_0000, 0b111_1111, 0b111_1011,
];

/// Rounded square centered on `center` with `number` drawn inside as block digits.
pub fn marker_shape(center: Point, number: usize, style: &MarkerStyle) -> MarkerShape {
    let half = style.size / 2.0;
    let rect = Rect::new(
        center.x - half,
        center.y - half,
        center.x + half,
        center.y + half,
    );
    let badge = RoundedRect::from_rect(rect, style.corner_radius).to_path(TOLERANCE);
    MarkerShape {
        badge,
        digits: number_path(center, number, style.font_size),
    }
}

/// Block digits for `number` centered on `center`. Cap height is `0.7 * font_size`.
pub fn number_path(center: Point, number: usize, font_size: f64) -> BezPath {
    let h = font_size * 0.7;
    let w = h * 0.55;
    let t = (font_size * 0.12).max(0.5);
    let gap = t;

    let digits: Vec<usize> = number
        .to_string()
        .bytes()
        .map(|b| usize::from(b - b'0'))
        .collect();
    let n = digits.len() as f64;
    let total_w = n * w + (n - 1.0) * gap;
    let mut x = center.x - total_w / 2.0;
    let y = center.y - h / 2.0;

    let mut path = BezPath::new();
    for d in digits {
        append_digit(&mut path, Point::new(x, y), d, w, h, t);
        x += w + gap;
    }
    path
}

fn append_digit(path: &mut BezPath, origin: Point, digit: usize, w: f64, h: f64, t: f64) {
    let Some(&bits) = SEGMENTS.get(digit) else {
        return;
    };
    let mid0 = (h - t) / 2.0;
    let mid1 = (h + t) / 2.0;
    let segs = [
        Rect::new(0.0, 0.0, w, t),
        Rect::new(w - t, 0.0, w, mid1),
        Rect::new(w - t, mid0, w, h),
        Rect::new(0.0, h - t, w, h),
        Rect::new(0.0, mid0, t, h),
        Rect::new(0.0, 0.0, t, mid1),
        Rect::new(0.0, mid0, w, mid1),
    ];
    for (i, seg) in segs.iter().enumerate() {
        if bits & (1 << (6 - i)) != 0 {
            let r = *seg + origin.to_vec2();
            path.extend(r.path_elements(TOLERANCE));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/marker.rs"]
mod tests;
