use kurbo::{Affine, BezPath, Point};

use crate::{
    catalog::template::LayoutTemplate,
    foundation::core::Canvas,
    foundation::math::point_in_polygon,
    geometry::offset::PolygonOffset,
    geometry::polygon::{centroid, inset_polygon_with, percent_to_logical, polygon_to_path},
};

/// Derived logical-space geometry for one panel. Recomputed on demand, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelGeometry {
    pub index: usize,
    pub outer: Vec<Point>,
    /// `outer` shrunk by half the gutter width; the image clip region.
    pub inner: Vec<Point>,
    /// Vertex mean of `inner`; where the panel number marker sits.
    pub centroid: Point,
}

impl PanelGeometry {
    pub fn clip_path(&self) -> BezPath {
        polygon_to_path(&self.inner)
    }

    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p, &self.inner)
    }

    /// The same geometry mapped through `xf` (for example the display scale).
    pub fn transformed(&self, xf: Affine) -> Self {
        Self {
            index: self.index,
            outer: self.outer.iter().map(|&p| xf * p).collect(),
            inner: self.inner.iter().map(|&p| xf * p).collect(),
            centroid: xf * self.centroid,
        }
    }
}

/// Map every panel of `template` to the canvas and shrink it by `inset` logical px.
/// Callers pass [`GutterStyle::inset`](crate::config::GutterStyle::inset).
pub fn compute_panel_geometries(
    template: &LayoutTemplate,
    canvas: Canvas,
    inset: f64,
) -> Vec<PanelGeometry> {
    compute_panel_geometries_with(
        &crate::geometry::offset::RoundJoinOffset::default(),
        template,
        canvas,
        inset,
    )
}

pub fn compute_panel_geometries_with<O: PolygonOffset + ?Sized>(
    offsetter: &O,
    template: &LayoutTemplate,
    canvas: Canvas,
    inset: f64,
) -> Vec<PanelGeometry> {
    template
        .panels
        .iter()
        .map(|panel| {
            let outer = percent_to_logical(&panel.points, canvas);
            let inner = inset_polygon_with(offsetter, &outer, inset);
            PanelGeometry {
                index: panel.index,
                centroid: centroid(&inner),
                outer,
                inner,
            }
        })
        .collect()
}

/// Index of the top-most panel (last drawn) whose clip region contains `p`.
pub fn panel_at(geoms: &[PanelGeometry], p: Point) -> Option<usize> {
    geoms.iter().rev().find(|g| g.contains(p)).map(|g| g.index)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/panel.rs"]
mod tests;
