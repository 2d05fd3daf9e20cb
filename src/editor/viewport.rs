use kurbo::{Point, Vec2};

use crate::foundation::{
    core::Canvas,
    error::{PanelError, PanelResult},
};

/// On-screen presentation of the logical canvas.
///
/// `scale` is the only free variable: display height is always `canvas.height * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    canvas: Canvas,
    display_width: f64,
}

impl Viewport {
    /// Fit the canvas into `available_width`, capped at `max_width`.
    pub fn fit(canvas: Canvas, available_width: f64, max_width: f64) -> PanelResult<Self> {
        let w = available_width.min(max_width);
        if available_width.is_nan() || !w.is_finite() || w <= 0.0 {
            return Err(PanelError::validation(format!(
                "display width must be finite and > 0, got {w}"
            )));
        }
        Ok(Self {
            canvas,
            display_width: w,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn display_width(&self) -> f64 {
        self.display_width
    }

    pub fn display_height(&self) -> f64 {
        self.canvas.height_f64() * self.scale()
    }

    /// `S = display width / logical width`.
    pub fn scale(&self) -> f64 {
        self.display_width / self.canvas.width_f64()
    }

    /// Render scale for an export at `target_width` pixels, relative to the display.
    pub fn pixel_ratio(&self, target_width: u32) -> f64 {
        f64::from(target_width) / self.display_width
    }

    pub fn to_logical(&self, display: Point) -> Point {
        let s = self.scale();
        Point::new(display.x / s, display.y / s)
    }

    pub fn to_display(&self, logical: Point) -> Point {
        let s = self.scale();
        Point::new(logical.x * s, logical.y * s)
    }

    /// Pointer movement in display pixels to logical units.
    pub fn delta_to_logical(&self, display_delta: Vec2) -> Vec2 {
        display_delta / self.scale()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/viewport.rs"]
mod tests;
