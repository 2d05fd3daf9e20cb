use crate::foundation::error::{PanelError, PanelResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Logical canvas size. All geometry and placement state lives in this space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Default page size: 800x1200, a 2:3 portrait page.
    pub const PAGE: Canvas = Canvas {
        width: 800,
        height: 1200,
    };

    pub fn new(width: u32, height: u32) -> PanelResult<Self> {
        if width == 0 || height == 0 {
            return Err(PanelError::validation("canvas width and height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// Height divided by width.
    pub fn aspect(self) -> f64 {
        self.height_f64() / self.width_f64()
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_f64(), self.height_f64())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::PAGE
    }
}

/// A point in page-percentage space (0..=100 on both axes). Serialized as `[x, y]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PctPoint(pub f64, pub f64);

impl PctPoint {
    pub fn is_in_page(self) -> bool {
        (0.0..=100.0).contains(&self.0) && (0.0..=100.0).contains(&self.1)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
