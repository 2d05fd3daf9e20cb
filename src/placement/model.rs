use std::collections::BTreeMap;

use kurbo::{Affine, Rect};

use crate::foundation::{
    core::Canvas,
    error::{PanelError, PanelResult},
};

/// Pan/zoom of one panel's image, in logical canvas units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelPlacement {
    pub offset_x: f64,
    pub offset_y: f64,
    /// Fraction of the canvas width the image spans.
    pub scale: f64,
}

impl Default for PanelPlacement {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self { min: 0.2, max: 2.0 }
    }
}

impl ScaleRange {
    pub fn new(min: f64, max: f64) -> PanelResult<Self> {
        let r = Self { min, max };
        r.validate()?;
        Ok(r)
    }

    pub fn validate(&self) -> PanelResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min <= 0.0 {
            return Err(PanelError::validation(
                "scale range bounds must be finite and > 0",
            ));
        }
        if self.min > self.max {
            return Err(PanelError::validation(format!(
                "scale range is inverted: {} > {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// Per-panel placements keyed by panel index. Entries appear on first edit;
/// a missing entry reads as [`PanelPlacement::default`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementMap {
    #[serde(default)]
    range: ScaleRange,
    #[serde(default)]
    entries: BTreeMap<usize, PanelPlacement>,
}

impl PlacementMap {
    pub fn new(range: ScaleRange) -> Self {
        Self {
            range,
            entries: BTreeMap::new(),
        }
    }

    pub fn range(&self) -> ScaleRange {
        self.range
    }

    pub fn get(&self, panel: usize) -> PanelPlacement {
        self.entries.get(&panel).copied().unwrap_or_default()
    }

    /// Sets the scale clamped to the range; NaN is ignored. Offsets are untouched.
    pub fn set_scale(&mut self, panel: usize, value: f64) {
        if value.is_nan() {
            return;
        }
        let scale = self.range.clamp(value);
        self.entries.entry(panel).or_default().scale = scale;
    }

    /// Adds to the stored offset. Unclamped: the image may leave its clip region entirely.
    /// A non-finite delta is ignored.
    pub fn adjust_offset(&mut self, panel: usize, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let p = self.entries.entry(panel).or_default();
        p.offset_x += dx;
        p.offset_y += dy;
    }

    pub fn reset_panel(&mut self, panel: usize) {
        self.entries.insert(panel, PanelPlacement::default());
    }

    pub fn reset_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PanelPlacement)> {
        self.entries.iter().map(|(&k, v)| (k, v))
    }

    /// Loads explicit entries (e.g. from a saved page), clamping each scale.
    pub fn insert(&mut self, panel: usize, placement: PanelPlacement) {
        let mut p = placement;
        if p.scale.is_nan() {
            p.scale = 1.0;
        }
        p.scale = self.range.clamp(p.scale);
        self.entries.insert(panel, p);
    }
}

/// Where an image of natural size `image_w`x`image_h` lands on the canvas.
///
/// The width is `canvas.width * scale` with aspect ratio preserved; the rect is
/// centered on the canvas, then shifted by the stored offset. Scale is relative to
/// the whole canvas, not the panel, and the offset is relative to that centered
/// position, not the panel polygon.
pub fn draw_rect(canvas: Canvas, placement: &PanelPlacement, image_w: u32, image_h: u32) -> Rect {
    let cw = canvas.width_f64();
    let ch = canvas.height_f64();
    let draw_w = cw * placement.scale;
    let draw_h = if image_w == 0 {
        0.0
    } else {
        draw_w * (f64::from(image_h) / f64::from(image_w))
    };
    let x = (cw - draw_w) / 2.0 + placement.offset_x;
    let y = (ch - draw_h) / 2.0 + placement.offset_y;
    Rect::new(x, y, x + draw_w, y + draw_h)
}

/// Image-pixel space to logical canvas space for [`draw_rect`].
pub fn image_transform(
    canvas: Canvas,
    placement: &PanelPlacement,
    image_w: u32,
    image_h: u32,
) -> Affine {
    let r = draw_rect(canvas, placement, image_w, image_h);
    let k = if image_w == 0 {
        0.0
    } else {
        r.width() / f64::from(image_w)
    };
    Affine::translate((r.x0, r.y0)) * Affine::scale(k)
}

#[cfg(test)]
#[path = "../../tests/unit/placement/model.rs"]
mod tests;
