use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Context;

use crate::{
    catalog::template::{LayoutTemplate, to_svg_path},
    foundation::color::ColorDef,
    foundation::error::{PanelError, PanelResult},
};

/// Look of a layout selector preview. Panels are drawn in a 100x100 view box
/// stretched to `width`x`height`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThumbnailStyle {
    pub width: u32,
    pub height: u32,
    pub background: ColorDef,
    pub accent: ColorDef,
    pub fill_opacity: f64,
    pub stroke_width: f64,
    pub label: ColorDef,
}

impl Default for ThumbnailStyle {
    fn default() -> Self {
        Self {
            width: 80,
            height: 120,
            background: ColorDef::from_rgba8(0x2a, 0x2a, 0x3e, 255),
            accent: ColorDef::from_rgba8(0xe9, 0x45, 0x60, 255),
            fill_opacity: 0.3,
            stroke_width: 1.5,
            label: ColorDef::WHITE,
        }
    }
}

/// Label size for a panel whose smaller bound is `extent` percent of the page.
pub fn label_font_size(extent: f64) -> f64 {
    (extent * 0.35).max(8.0)
}

/// Standalone SVG document previewing `template`.
pub fn thumbnail_svg(template: &LayoutTemplate, style: &ThumbnailStyle) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 100 100" preserveAspectRatio="none">"#,
        style.width, style.height
    );
    let _ = write!(
        out,
        r#"<rect x="0" y="0" width="100" height="100" fill="{}"/>"#,
        style.background.to_hex()
    );
    for panel in &template.panels {
        let c = panel.preview_centroid();
        let _ = write!(
            out,
            r#"<g><path d="{}" fill="{accent}" fill-opacity="{}" stroke="{accent}" stroke-width="{}"/>"#,
            to_svg_path(panel),
            style.fill_opacity,
            style.stroke_width,
            accent = style.accent.to_hex(),
        );
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" fill="{}" font-size="{}" font-weight="bold" font-family="sans-serif">{}</text></g>"#,
            c.x,
            c.y,
            style.label.to_hex(),
            label_font_size(panel.preview_extent()),
            panel.index + 1
        );
    }
    out.push_str("</svg>");
    out
}

fn svg_options() -> usvg::Options<'static> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    usvg::Options {
        fontdb: Arc::new(db),
        ..Default::default()
    }
}

/// Rasterize the preview of `template` to premultiplied RGBA8 at the style's size.
pub fn rasterize_thumbnail(
    template: &LayoutTemplate,
    style: &ThumbnailStyle,
) -> PanelResult<Vec<u8>> {
    let svg = thumbnail_svg(template, style);
    let tree = usvg::Tree::from_data(svg.as_bytes(), &svg_options())
        .context("parse thumbnail svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(style.width, style.height)
        .ok_or_else(|| PanelError::render("failed to allocate thumbnail pixmap"))?;
    let sx = (style.width as f32) / tree.size().width();
    let sy = (style.height as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/thumbnail.rs"]
mod tests;
