use super::*;
use crate::{
    assets::decode::ImageLoad,
    assets::set::PanelImageSet,
    catalog::library::LayoutCatalog,
    config::GutterStyle,
    foundation::color::ColorDef,
    foundation::core::Canvas,
    geometry::panel::compute_panel_geometries,
    placement::model::PlacementMap,
    render::backend::RenderBackend,
    render::compile::{PageScene, RenderTarget, compile_page},
    render::marker::MarkerStyle,
};

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn assert_px(frame: &FrameRGBA, x: u32, y: u32, want: [u8; 4]) {
    let got = px(frame, x, y);
    for c in 0..4 {
        assert!(
            (i16::from(got[c]) - i16::from(want[c])).abs() <= 2,
            "pixel ({x}, {y}) is {got:?}, want {want:?}"
        );
    }
}

fn render(
    canvas: Canvas,
    scale: f64,
    images: &PanelImageSet,
    markers: Option<&MarkerStyle>,
    gutter: f64,
) -> FrameRGBA {
    let cat = LayoutCatalog::builtin().unwrap();
    let t = cat.require("two-rows").unwrap();
    let gutter = GutterStyle {
        color: ColorDef::BLACK,
        width_px: gutter,
    };
    let geoms = compute_panel_geometries(t, canvas, gutter.inset());
    let placements = PlacementMap::default();
    let scene = PageScene {
        canvas,
        geometries: &geoms,
        placements: &placements,
        images,
        gutter_color: gutter.color,
        placeholder_color: ColorDef::from_rgba8(0x1a, 0x1a, 0x2e, 255),
        markers,
    };
    let plan = compile_page(&scene, RenderTarget::at_scale(canvas, scale).unwrap());
    CpuBackend::new(RenderSettings::default())
        .render_plan(&plan)
        .unwrap()
}

#[test]
fn image_clip_placeholder_and_gutter() {
    let canvas = Canvas::new(20, 30).unwrap();
    let red = PanelImage::solid(10, 10, [255, 0, 0, 255]).unwrap();
    let images = PanelImageSet::from_sequence([ImageLoad::Loaded(red)], 2);
    let frame = render(canvas, 1.0, &images, None, 2.0);

    assert_eq!((frame.width, frame.height), (20, 30));
    // Image spans y 5..25 but is clipped to the top panel.
    assert_px(&frame, 10, 10, [255, 0, 0, 255]);
    // Above the image inside the top panel: background shows through.
    assert_px(&frame, 10, 2, [0, 0, 0, 255]);
    // Gutter row between the panels.
    assert_px(&frame, 10, 15, [0, 0, 0, 255]);
    // Outer gutter edge.
    assert_px(&frame, 0, 10, [0, 0, 0, 255]);
    // Bottom panel has no image.
    assert_px(&frame, 10, 22, [0x1a, 0x1a, 0x2e, 255]);
}

#[test]
fn markers_darken_the_panel_when_visible() {
    let images = PanelImageSet::with_panel_count(2);
    let style = MarkerStyle::default();
    let shown = render(Canvas::PAGE, 0.25, &images, Some(&style), 4.0);
    let hidden = render(Canvas::PAGE, 0.25, &images, None, 4.0);
    assert_eq!((shown.width, shown.height), (200, 300));

    assert_px(&hidden, 98, 73, [0x1a, 0x1a, 0x2e, 255]);
    let [r, _, b, a] = px(&shown, 98, 73);
    assert!(r < 0x1a && b < 0x2e, "badge should darken the placeholder");
    assert_eq!(a, 255);
    // Far from the marker nothing changes.
    assert_eq!(px(&shown, 20, 20), px(&hidden, 20, 20));
}

#[test]
fn clear_color_shows_where_nothing_draws() {
    let mut backend = CpuBackend::new(RenderSettings {
        clear_rgba: Some([0, 0, 255, 255]),
    });
    let plan = PagePlan {
        size: Canvas::new(4, 4).unwrap(),
        view: Affine::IDENTITY,
        ops: vec![],
    };
    let frame = backend.render_plan(&plan).unwrap();
    assert_px(&frame, 1, 1, [0, 0, 255, 255]);
    let mut plain = CpuBackend::new(RenderSettings::default());
    let frame = plain.render_plan(&plan).unwrap();
    assert_px(&frame, 1, 1, [0, 0, 0, 0]);
}

#[test]
fn exec_before_begin_is_an_error() {
    let mut backend = CpuBackend::new(RenderSettings::default());
    let op = DrawOp::FillPath {
        path: BezPath::new(),
        transform: Affine::IDENTITY,
        color: Rgba8Premul::transparent(),
    };
    assert!(backend.exec_op(&op).is_err());
}

#[test]
fn premultiplied_colors_paint_straight() {
    let c = paint_color(Rgba8Premul::from_straight_rgba(200, 100, 0, 128));
    let rgba = c.to_rgba8();
    assert_eq!(rgba.a, 128);
    assert!((i16::from(rgba.r) - 200).abs() <= 1);
    assert!((i16::from(rgba.g) - 100).abs() <= 1);
}
