use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100, 50, 200, 128]);
    let img = decode_panel_image(&buf).unwrap();
    assert_eq!((img.width, img.height), (1, 1));
    assert_eq!(
        img.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn garbage_bytes_are_an_image_load_error() {
    let err = decode_panel_image(b"not an image").unwrap_err();
    assert!(matches!(err, PanelError::ImageLoad(_)));
}

#[test]
fn ids_follow_content() {
    let a = PanelImage::solid(2, 2, [255, 0, 0, 255]).unwrap();
    let b = PanelImage::solid(2, 2, [255, 0, 0, 255]).unwrap();
    let c = PanelImage::solid(2, 2, [0, 255, 0, 255]).unwrap();
    let d = PanelImage::solid(1, 4, [255, 0, 0, 255]).unwrap();
    assert_eq!(a.id, b.id);
    assert_ne!(a.id, c.id);
    assert_ne!(a.id, d.id);
}

#[test]
fn byte_length_and_size_are_checked() {
    assert!(PanelImage::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(PanelImage::from_premul_rgba8(0, 2, vec![]).is_err());
}

#[tokio::test]
async fn async_loads_report_typed_results() {
    let ok = load_panel_image_bytes(png_bytes(3, 2, vec![9; 24])).await;
    let img = ok.image().unwrap();
    assert_eq!((img.width, img.height), (3, 2));

    let bad = load_panel_image_bytes(vec![1, 2, 3]).await;
    assert!(!bad.is_loaded());
    assert!(matches!(bad, ImageLoad::Failed(ref msg) if msg.contains("image load error")));

    let missing = load_panel_image("/definitely/not/here.png").await;
    assert!(matches!(missing, ImageLoad::Failed(ref msg) if msg.contains("read image")));
}

#[tokio::test]
async fn decode_runs_off_the_polling_thread() {
    use std::future::Future;
    use std::task::{Context, Poll, Waker};

    let bytes = png_bytes(64, 64, vec![200; 64 * 64 * 4]);
    let mut fut = Box::pin(load_panel_image_bytes(bytes));

    // The first poll only hands the decode to the blocking pool.
    let mut cx = Context::from_waker(Waker::noop());
    assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Pending));

    let load = fut.await;
    assert_eq!(load.image().map(|i| (i.width, i.height)), Some((64, 64)));
}

#[tokio::test]
async fn file_loads_yield_before_completing() {
    use std::future::Future;
    use std::task::{Context, Poll, Waker};

    let path = std::env::temp_dir().join(format!(
        "panelcraft_yield_{}_{}.png",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::write(&path, png_bytes(8, 8, vec![50; 8 * 8 * 4])).unwrap();

    let mut fut = Box::pin(load_panel_image(path.clone()));
    let mut cx = Context::from_waker(Waker::noop());
    assert!(matches!(fut.as_mut().poll(&mut cx), Poll::Pending));
    assert!(fut.await.is_loaded());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn unpremultiply_inverts_premultiply_for_opaque_and_half() {
    let mut px = vec![200, 100, 50, 255, 100, 50, 200, 128, 7, 7, 7, 0];
    let orig = px.clone();
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &orig[..4]);
    for i in 4..7 {
        assert!((i16::from(px[i]) - i16::from(orig[i])).abs() <= 1);
    }
    assert_eq!(&px[8..], &[0, 0, 0, 0]);
}
