use super::*;
use crate::{
    assets::decode::{ImageLoad, PanelImage},
    catalog::library::LayoutCatalog,
    geometry::panel::compute_panel_geometries,
};
use kurbo::Point;

fn four_grid() -> Vec<PanelGeometry> {
    let cat = LayoutCatalog::builtin().unwrap();
    compute_panel_geometries(cat.require("four-grid").unwrap(), Canvas::PAGE, 2.0)
}

fn image(w: u32, h: u32) -> ImageLoad {
    ImageLoad::Loaded(PanelImage::solid(w, h, [10, 20, 30, 255]).unwrap())
}

fn scene<'a>(
    geoms: &'a [PanelGeometry],
    placements: &'a PlacementMap,
    images: &'a PanelImageSet,
    markers: Option<&'a MarkerStyle>,
) -> PageScene<'a> {
    PageScene {
        canvas: Canvas::PAGE,
        geometries: geoms,
        placements,
        images,
        gutter_color: ColorDef::BLACK,
        placeholder_color: ColorDef::from_rgba8(0x1a, 0x1a, 0x2e, 255),
        markers,
    }
}

#[test]
fn render_target_rounds_scaled_canvas() {
    let t = RenderTarget::at_scale(Canvas::PAGE, 0.5).unwrap();
    assert_eq!(t.size, Canvas::new(400, 600).unwrap());
    assert_eq!(t.view, Affine::scale(0.5));

    let t = RenderTarget::at_scale(Canvas::PAGE, 300.0 / 800.0).unwrap();
    assert_eq!((t.size.width, t.size.height), (300, 450));

    assert!(RenderTarget::at_scale(Canvas::PAGE, 0.0).is_err());
    assert!(RenderTarget::at_scale(Canvas::PAGE, f64::NAN).is_err());
    assert!(RenderTarget::at_scale(Canvas::PAGE, 1e6).is_err());
}

#[test]
fn two_images_four_panels() {
    let geoms = four_grid();
    let placements = PlacementMap::default();
    let images = PanelImageSet::from_sequence([image(4, 6), image(8, 8)], 4);
    let style = MarkerStyle::default();
    let s = scene(&geoms, &placements, &images, Some(&style));
    let plan = compile_page(&s, RenderTarget::at_scale(Canvas::PAGE, 0.5).unwrap());

    let records: Vec<_> = plan.panel_records().collect();
    assert_eq!(records.iter().map(|r| r.panel).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(plan.placeholder_panels(), vec![2, 3]);
    assert_eq!(plan.marker_count(), 4);
    // Background + 4 panel ops + 4 markers.
    assert_eq!(plan.ops.len(), 9);
    assert!(matches!(plan.ops[0], DrawOp::FillPath { .. }));
    // Each marker follows its panel.
    assert_eq!(plan.ops[2].panel(), Some(0));
    assert!(plan.ops[2].is_marker());
}

#[test]
fn hidden_markers_emit_no_marker_ops() {
    let geoms = four_grid();
    let placements = PlacementMap::default();
    let images = PanelImageSet::with_panel_count(4);
    let plan = compile_page(
        &scene(&geoms, &placements, &images, None),
        RenderTarget::at_scale(Canvas::PAGE, 1.0).unwrap(),
    );
    assert_eq!(plan.marker_count(), 0);
    assert_eq!(plan.ops.len(), 5);
}

#[test]
fn image_transform_composes_view_and_placement() {
    let geoms = four_grid();
    let mut placements = PlacementMap::default();
    placements.set_scale(0, 1.2);
    placements.adjust_offset(0, 10.0, -20.0);
    let images = PanelImageSet::from_sequence([image(1000, 1500)], 4);
    let plan = compile_page(
        &scene(&geoms, &placements, &images, None),
        RenderTarget::at_scale(Canvas::PAGE, 0.5).unwrap(),
    );
    let rec = plan.panel_records().next().unwrap();
    // Logical draw rect is (-70, -140) .. (890, 1300); device is half of that.
    let tl = rec.transform * Point::ZERO;
    let br = rec.transform * Point::new(1000.0, 1500.0);
    assert!((tl - Point::new(-35.0, -70.0)).hypot() < 1e-9);
    assert!((br - Point::new(445.0, 650.0)).hypot() < 1e-9);
    // Clip stays logical; the op's clip transform maps it.
    assert_eq!(rec.clip, geoms[0].inner.as_slice());
}
