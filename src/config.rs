use crate::{
    foundation::color::ColorDef,
    foundation::core::Canvas,
    foundation::error::{PanelError, PanelResult},
    placement::model::ScaleRange,
    render::marker::MarkerStyle,
};

/// Engine-wide settings. Passed explicitly to every session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logical canvas; also the export resolution.
    pub canvas: Canvas,
    pub scale_range: ScaleRange,
    pub max_gutter_width: f64,
    pub markers_visible: bool,
    pub placeholder_color: ColorDef,
    pub marker: MarkerStyle,
    pub max_panels: usize,
    /// Upper bound for the on-screen preview width in pixels.
    pub max_display_width: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::PAGE,
            scale_range: ScaleRange::default(),
            max_gutter_width: 12.0,
            markers_visible: true,
            placeholder_color: ColorDef::from_rgba8(0x1a, 0x1a, 0x2e, 255),
            marker: MarkerStyle::default(),
            max_panels: 9,
            max_display_width: 400.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> PanelResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| PanelError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> PanelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PanelError::validation("canvas width and height must be > 0"));
        }
        self.scale_range.validate()?;
        if !self.max_gutter_width.is_finite() || self.max_gutter_width < 0.0 {
            return Err(PanelError::validation(
                "max_gutter_width must be finite and >= 0",
            ));
        }
        if self.max_panels == 0 {
            return Err(PanelError::validation("max_panels must be >= 1"));
        }
        if !self.max_display_width.is_finite() || self.max_display_width <= 0.0 {
            return Err(PanelError::validation(
                "max_display_width must be finite and > 0",
            ));
        }
        if !self.marker.size.is_finite() || self.marker.size <= 0.0 {
            return Err(PanelError::validation("marker size must be > 0"));
        }
        Ok(())
    }
}

/// Page-wide gutter between panels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GutterStyle {
    pub color: ColorDef,
    pub width_px: f64,
}

impl Default for GutterStyle {
    fn default() -> Self {
        Self {
            color: ColorDef::BLACK,
            width_px: 4.0,
        }
    }
}

impl GutterStyle {
    /// Width clamped to `[0, max_width]`; NaN reads as 0.
    pub fn clamped(self, max_width: f64) -> Self {
        let width_px = if self.width_px.is_nan() {
            0.0
        } else {
            self.width_px.clamp(0.0, max_width.max(0.0))
        };
        Self { width_px, ..self }
    }

    /// Each panel gives up half of the gutter.
    pub fn inset(&self) -> f64 {
        (self.width_px / 2.0).max(0.0)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
