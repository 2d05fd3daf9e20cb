//! Panelcraft lays images out on multi-panel comic pages.
//!
//! A page is a fixed logical canvas (800x1200 by default) divided into polygonal
//! panels by a [`LayoutTemplate`]. Each panel holds at most one image that the user
//! can pan and zoom; the image is always clipped to the panel's inset polygon so the
//! gutter stays visible between panels.
//!
//! # Pipeline overview
//!
//! 1. **Geometry**: `LayoutTemplate + Canvas + gutter -> [PanelGeometry]` (percent
//!    vertices mapped to logical units, then inset by half the gutter)
//! 2. **Compile**: `geometry + PlacementMap + PanelImageSet -> PagePlan`, a backend-agnostic
//!    list of `{clip polygon, image, transform}` records plus fills and markers
//! 3. **Render**: `PagePlan -> FrameRGBA` (CPU backend on `vello_cpu`)
//! 4. **Export**: the same plan compiled at canvas resolution with markers hidden,
//!    encoded to PNG
//!
//! Placements live in logical canvas units, so the preview at any display width and
//! the exported page agree up to the display scale.
//!
//! [`EditorSession`] ties these together: layout selection, pointer drags, zoom,
//! reset, and the export / accept / reject lifecycle.
#![forbid(unsafe_code)]

mod assets;
mod catalog;
mod config;
mod document;
mod editor;
mod export;
mod foundation;
mod geometry;
mod placement;
mod render;

pub use assets::decode::{
    ImageLoad, PanelImage, decode_panel_image, load_panel_image, load_panel_image_bytes,
};
pub use assets::set::PanelImageSet;
pub use catalog::library::LayoutCatalog;
pub use catalog::template::{LayoutTemplate, Panel, to_preview_path, to_svg_path};
pub use catalog::thumbnail::{
    ThumbnailStyle, label_font_size, rasterize_thumbnail, thumbnail_svg,
};
pub use config::{EngineConfig, GutterStyle};
pub use document::PageDocument;
pub use editor::session::{EditorSession, SessionState};
pub use editor::viewport::Viewport;
pub use export::page::{ExportedPage, export_pages};
pub use foundation::color::ColorDef;
pub use foundation::core::{Affine, BezPath, Canvas, PctPoint, Point, Rect, Rgba8Premul, Vec2};
pub use foundation::error::{PanelError, PanelResult};
pub use geometry::alpha::{
    ContentBounds, alpha_channel, bounds_of_visible_content, frame_content_bounds,
};
pub use geometry::offset::{PolygonOffset, RoundJoinOffset};
pub use geometry::panel::{
    PanelGeometry, compute_panel_geometries, compute_panel_geometries_with, panel_at,
};
pub use geometry::polygon::{
    bounding_box, centroid, inset_polygon, inset_polygon_with, percent_to_logical,
    polygon_to_path,
};
pub use placement::model::{
    PanelPlacement, PlacementMap, ScaleRange, draw_rect, image_transform,
};
pub use render::backend::{
    BackendKind, FrameRGBA, OpBackend, RenderBackend, RenderSettings, create_backend,
    execute_plan,
};
pub use render::compile::{PageScene, RenderTarget, compile_page};
pub use render::cpu::CpuBackend;
pub use render::marker::{MarkerShape, MarkerStyle, marker_shape, number_path};
pub use render::plan::{DrawOp, PagePlan, PanelRecord, device_clip_path};
