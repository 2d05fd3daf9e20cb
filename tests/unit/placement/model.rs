use super::*;
use kurbo::Point;

#[test]
fn missing_entries_read_as_default() {
    let m = PlacementMap::default();
    assert_eq!(m.get(3), PanelPlacement::default());
    assert!(m.is_empty());
}

#[test]
fn scale_is_clamped_and_keeps_offsets() {
    let mut m = PlacementMap::default();
    m.adjust_offset(0, 10.0, -4.0);
    m.set_scale(0, 5.0);
    assert_eq!(
        m.get(0),
        PanelPlacement {
            offset_x: 10.0,
            offset_y: -4.0,
            scale: 2.0
        }
    );
    m.set_scale(0, 0.01);
    assert_eq!(m.get(0).scale, 0.2);
    m.set_scale(0, f64::NAN);
    assert_eq!(m.get(0).scale, 0.2);
    m.set_scale(0, 1.3);
    assert_eq!(m.get(0).scale, 1.3);
}

#[test]
fn offsets_accumulate_without_bounds() {
    let mut m = PlacementMap::default();
    m.adjust_offset(1, 5000.0, 0.0);
    m.adjust_offset(1, 2500.0, -9000.0);
    assert_eq!(m.get(1).offset_x, 7500.0);
    assert_eq!(m.get(1).offset_y, -9000.0);
    assert_eq!(m.get(1).scale, 1.0);
}

#[test]
fn non_finite_offsets_are_ignored() {
    let mut m = PlacementMap::default();
    m.adjust_offset(0, 3.0, 4.0);
    m.adjust_offset(0, f64::NAN, 1.0);
    m.adjust_offset(0, 1.0, f64::INFINITY);
    m.adjust_offset(0, f64::NEG_INFINITY, f64::NAN);
    assert_eq!(m.get(0).offset_x, 3.0);
    assert_eq!(m.get(0).offset_y, 4.0);
    m.adjust_offset(1, f64::NAN, 0.0);
    assert_eq!(m.get(1), PanelPlacement::default());
}

#[test]
fn resets() {
    let mut m = PlacementMap::default();
    m.adjust_offset(0, 1.0, 1.0);
    m.set_scale(1, 0.5);
    m.reset_panel(0);
    assert_eq!(m.get(0), PanelPlacement::default());
    assert_eq!(m.get(1).scale, 0.5);
    m.reset_all();
    assert!(m.is_empty());
}

#[test]
fn custom_range_and_validation() {
    assert!(ScaleRange::new(2.0, 1.0).is_err());
    assert!(ScaleRange::new(0.0, 1.0).is_err());
    let mut m = PlacementMap::new(ScaleRange::new(0.5, 1.5).unwrap());
    m.set_scale(0, 3.0);
    assert_eq!(m.get(0).scale, 1.5);
    m.insert(
        1,
        PanelPlacement {
            offset_x: 1.0,
            offset_y: 2.0,
            scale: 0.1,
        },
    );
    assert_eq!(m.get(1).scale, 0.5);
}

#[test]
fn draw_rect_is_canvas_centered() {
    let canvas = Canvas::PAGE;
    let p = PanelPlacement {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.2,
    };
    let r = draw_rect(canvas, &p, 1000, 1500);
    assert_eq!(r.width(), 960.0);
    assert_eq!(r.height(), 1440.0);
    assert_eq!(r.origin(), Point::new(-80.0, -120.0));

    let moved = PanelPlacement {
        offset_x: 30.0,
        offset_y: -12.5,
        ..p
    };
    let r2 = draw_rect(canvas, &moved, 1000, 1500);
    assert_eq!(r2.origin(), Point::new(-50.0, -132.5));
    assert_eq!(r2.size(), r.size());
}

#[test]
fn image_transform_maps_corners_onto_draw_rect() {
    let canvas = Canvas::PAGE;
    let p = PanelPlacement {
        offset_x: 7.0,
        offset_y: 3.0,
        scale: 0.5,
    };
    let xf = image_transform(canvas, &p, 400, 300);
    let r = draw_rect(canvas, &p, 400, 300);
    assert_eq!(xf * Point::ZERO, r.origin());
    let far = xf * Point::new(400.0, 300.0);
    assert!((far - Point::new(r.x1, r.y1)).hypot() < 1e-9);
}

#[test]
fn placements_serialize_by_panel_index() {
    let mut m = PlacementMap::default();
    m.adjust_offset(2, 1.5, 0.0);
    let json = serde_json::to_string(&m).unwrap();
    let back: PlacementMap = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
    assert_eq!(back.iter().map(|(i, _)| i).collect::<Vec<_>>(), vec![2]);
}
