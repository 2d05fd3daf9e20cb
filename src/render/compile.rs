use kurbo::{Affine, Shape};

use crate::{
    assets::set::PanelImageSet,
    foundation::color::ColorDef,
    foundation::core::Canvas,
    foundation::error::{PanelError, PanelResult},
    geometry::panel::PanelGeometry,
    placement::model::{PlacementMap, image_transform},
    render::marker::{MarkerStyle, marker_shape},
    render::plan::{DrawOp, PagePlan},
};

/// Everything that decides what a page looks like, independent of output size.
#[derive(Clone, Copy, Debug)]
pub struct PageScene<'a> {
    pub canvas: Canvas,
    pub geometries: &'a [PanelGeometry],
    pub placements: &'a PlacementMap,
    pub images: &'a PanelImageSet,
    pub gutter_color: ColorDef,
    pub placeholder_color: ColorDef,
    /// `None` hides the marker group.
    pub markers: Option<&'a MarkerStyle>,
}

/// Output pixmap size plus the logical-to-device transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTarget {
    pub size: Canvas,
    pub view: Affine,
}

impl RenderTarget {
    /// Uniform scale of the logical canvas; the pixmap is the scaled canvas rounded
    /// to whole pixels.
    pub fn at_scale(canvas: Canvas, scale: f64) -> PanelResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(PanelError::render(format!("invalid render scale {scale}")));
        }
        let w = (canvas.width_f64() * scale).round();
        let h = (canvas.height_f64() * scale).round();
        if w < 1.0 || h < 1.0 || w > f64::from(u16::MAX) || h > f64::from(u16::MAX) {
            return Err(PanelError::render(format!(
                "render size {w}x{h} is out of range"
            )));
        }
        Ok(Self {
            size: Canvas::new(w as u32, h as u32)?,
            view: Affine::scale(scale),
        })
    }
}

const PATH_TOLERANCE: f64 = 0.1;

/// Lower a page scene to draw ops: gutter background, then for every panel its
/// clipped image (or placeholder) followed by its marker.
#[tracing::instrument(
    level = "debug",
    skip(scene, target),
    fields(
        panels = scene.geometries.len(),
        width = target.size.width,
        height = target.size.height,
        markers = scene.markers.is_some()
    )
)]
pub fn compile_page(scene: &PageScene<'_>, target: RenderTarget) -> PagePlan {
    let view = target.view;
    let mut ops = Vec::with_capacity(1 + scene.geometries.len() * 2);

    ops.push(DrawOp::FillPath {
        path: scene.canvas.rect().to_path(PATH_TOLERANCE),
        transform: view,
        color: scene.gutter_color.to_rgba8_premul(),
    });

    for geom in scene.geometries {
        match scene.images.image(geom.index) {
            Some(image) => {
                let placement = scene.placements.get(geom.index);
                let image_xf = image_transform(scene.canvas, &placement, image.width, image.height);
                ops.push(DrawOp::PanelImage {
                    panel: geom.index,
                    clip: geom.inner.clone(),
                    clip_transform: view,
                    image: image.clone(),
                    transform: view * image_xf,
                });
            }
            None => ops.push(DrawOp::Placeholder {
                panel: geom.index,
                clip: geom.inner.clone(),
                clip_transform: view,
                color: scene.placeholder_color.to_rgba8_premul(),
            }),
        }

        if let Some(style) = scene.markers {
            let shape = marker_shape(geom.centroid, geom.index + 1, style);
            ops.push(DrawOp::Marker {
                panel: geom.index,
                clip: geom.inner.clone(),
                transform: view,
                badge: shape.badge,
                digits: shape.digits,
                fill: style.fill.to_rgba8_premul(),
                ink: style.ink.to_rgba8_premul(),
            });
        }
    }

    PagePlan {
        size: target.size,
        view,
        ops,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compile.rs"]
mod tests;
