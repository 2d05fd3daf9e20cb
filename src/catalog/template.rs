use kurbo::{BezPath, Point};

use crate::{
    foundation::core::PctPoint,
    foundation::error::{PanelError, PanelResult},
    foundation::math::signed_area,
};

/// One closed polygon region of a page, in page-percentage coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Panel {
    pub index: usize,
    pub points: Vec<PctPoint>,
}

/// A named set of panel polygons for a fixed panel count.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutTemplate {
    pub id: String,
    pub name: String,
    pub panel_count: usize,
    pub panels: Vec<Panel>,
}

impl LayoutTemplate {
    pub fn validate(&self) -> PanelResult<()> {
        if self.id.trim().is_empty() {
            return Err(PanelError::layout("template id must be non-empty"));
        }
        if self.panels.len() != self.panel_count {
            return Err(PanelError::layout(format!(
                "template '{}' declares {} panels but defines {}",
                self.id,
                self.panel_count,
                self.panels.len()
            )));
        }
        for (pos, panel) in self.panels.iter().enumerate() {
            if panel.index != pos {
                return Err(PanelError::layout(format!(
                    "template '{}' panel at position {pos} has index {}",
                    self.id, panel.index
                )));
            }
            panel
                .validate()
                .map_err(|e| PanelError::layout(format!("template '{}': {e}", self.id)))?;
        }
        Ok(())
    }
}

impl Panel {
    pub fn validate(&self) -> PanelResult<()> {
        if self.points.len() < 3 {
            return Err(PanelError::layout(format!(
                "panel {} needs at least 3 points, got {}",
                self.index,
                self.points.len()
            )));
        }
        if let Some(p) = self.points.iter().find(|p| !p.is_in_page()) {
            return Err(PanelError::layout(format!(
                "panel {} point [{}, {}] is outside 0..=100",
                self.index, p.0, p.1
            )));
        }
        if signed_area(&self.percent_points()).abs() <= f64::EPSILON {
            return Err(PanelError::layout(format!(
                "panel {} polygon has no area",
                self.index
            )));
        }
        Ok(())
    }

    fn percent_points(&self) -> Vec<Point> {
        self.points.iter().map(|&PctPoint(x, y)| Point::new(x, y)).collect()
    }

    /// Vertex-average center in percentage space, used for thumbnail labels.
    pub fn preview_centroid(&self) -> Point {
        crate::geometry::polygon::centroid(&self.percent_points())
    }

    /// `min(width, height)` of the panel's bounds in percentage space.
    pub fn preview_extent(&self) -> f64 {
        crate::geometry::polygon::bounding_box(&self.percent_points())
            .map(|r| r.width().min(r.height()))
            .unwrap_or(0.0)
    }
}

/// Closed outline of `panel` in a 100x100 percentage frame, for thumbnails.
pub fn to_preview_path(panel: &Panel) -> BezPath {
    crate::geometry::polygon::polygon_to_path(&panel.percent_points())
}

/// SVG path data (`M.. L.. Z`) for [`to_preview_path`].
pub fn to_svg_path(panel: &Panel) -> String {
    to_preview_path(panel).to_svg()
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/template.rs"]
mod tests;
