use kurbo::{Affine, BezPath, Point};

use crate::{
    assets::decode::PanelImage,
    foundation::core::{Canvas, Rgba8Premul},
    geometry::polygon::polygon_to_path,
};

/// Backend-agnostic description of one rendered page.
///
/// Geometry is stored in logical canvas space; each op carries the transform to
/// device pixels. `size` is the output pixmap size.
#[derive(Clone, Debug)]
pub struct PagePlan {
    pub size: Canvas,
    pub view: Affine,
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Solid fill, used for the gutter background.
    FillPath {
        path: BezPath,
        transform: Affine,
        color: Rgba8Premul,
    },
    /// A panel image clipped to the panel's inset polygon.
    PanelImage {
        panel: usize,
        clip: Vec<Point>,
        /// Logical to device; applied to `clip`.
        clip_transform: Affine,
        image: PanelImage,
        /// Image pixels to device.
        transform: Affine,
    },
    /// Neutral fill for a panel without a loaded image.
    Placeholder {
        panel: usize,
        clip: Vec<Point>,
        clip_transform: Affine,
        color: Rgba8Premul,
    },
    /// Panel number badge. Only ever emitted while markers are visible.
    Marker {
        panel: usize,
        clip: Vec<Point>,
        transform: Affine,
        badge: BezPath,
        digits: BezPath,
        fill: Rgba8Premul,
        ink: Rgba8Premul,
    },
}

impl DrawOp {
    pub fn panel(&self) -> Option<usize> {
        match self {
            DrawOp::FillPath { .. } => None,
            DrawOp::PanelImage { panel, .. }
            | DrawOp::Placeholder { panel, .. }
            | DrawOp::Marker { panel, .. } => Some(*panel),
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, DrawOp::Marker { .. })
    }
}

/// The `{clip polygon, image, transform}` triple for one image-bearing panel.
#[derive(Clone, Debug)]
pub struct PanelRecord<'a> {
    pub panel: usize,
    pub clip: &'a [Point],
    pub image: &'a PanelImage,
    pub transform: Affine,
}

impl PagePlan {
    pub fn marker_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_marker()).count()
    }

    /// Same plan with the marker group removed.
    pub fn without_markers(&self) -> PagePlan {
        PagePlan {
            size: self.size,
            view: self.view,
            ops: self
                .ops
                .iter()
                .filter(|op| !op.is_marker())
                .cloned()
                .collect(),
        }
    }

    pub fn panel_records(&self) -> impl Iterator<Item = PanelRecord<'_>> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::PanelImage {
                panel,
                clip,
                image,
                transform,
                ..
            } => Some(PanelRecord {
                panel: *panel,
                clip,
                image,
                transform: *transform,
            }),
            _ => None,
        })
    }

    pub fn placeholder_panels(&self) -> Vec<usize> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Placeholder { panel, .. } => Some(*panel),
                _ => None,
            })
            .collect()
    }
}

/// Clip polygon mapped to device space as a closed path.
pub fn device_clip_path(clip: &[Point], transform: Affine) -> BezPath {
    let pts: Vec<Point> = clip.iter().map(|&p| transform * p).collect();
    polygon_to_path(&pts)
}
