use kurbo::{Point, Rect};

use crate::{
    foundation::error::{PanelError, PanelResult},
    render::backend::FrameRGBA,
};

/// Pixel-aligned bounds of painted content in an alpha buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentBounds {
    /// Covers whole pixels: `x1 = last column + 1`, `y1 = last row + 1`.
    pub rect: Rect,
    pub center: Point,
}

/// Smallest rectangle enclosing every pixel whose alpha is strictly above `threshold`.
///
/// `alpha` is row-major, `width * height` bytes. Returns `Ok(None)` when nothing qualifies.
pub fn bounds_of_visible_content(
    alpha: &[u8],
    width: u32,
    height: u32,
    threshold: u8,
) -> PanelResult<Option<ContentBounds>> {
    let w = width as usize;
    let h = height as usize;
    if alpha.len() != w * h {
        return Err(PanelError::validation(format!(
            "alpha buffer is {} bytes, expected {w}x{h}",
            alpha.len()
        )));
    }
    if w == 0 {
        return Ok(None);
    }

    let mut min_x = usize::MAX;
    let mut min_y = usize::MAX;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    for (y, row) in alpha.chunks_exact(w).enumerate() {
        let Some(first) = row.iter().position(|&a| a > threshold) else {
            continue;
        };
        let last = row.iter().rposition(|&a| a > threshold).unwrap_or(first);
        min_x = min_x.min(first);
        max_x = max_x.max(last);
        min_y = min_y.min(y);
        max_y = y;
    }
    if min_x == usize::MAX {
        return Ok(None);
    }

    let rect = Rect::new(
        min_x as f64,
        min_y as f64,
        (max_x + 1) as f64,
        (max_y + 1) as f64,
    );
    Ok(Some(ContentBounds {
        rect,
        center: rect.center(),
    }))
}

/// Alpha channel of an RGBA8 frame, row-major.
pub fn alpha_channel(frame: &FrameRGBA) -> Vec<u8> {
    frame.data.chunks_exact(4).map(|px| px[3]).collect()
}

/// [`bounds_of_visible_content`] over a rendered frame.
pub fn frame_content_bounds(
    frame: &FrameRGBA,
    threshold: u8,
) -> PanelResult<Option<ContentBounds>> {
    bounds_of_visible_content(&alpha_channel(frame), frame.width, frame.height, threshold)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/alpha.rs"]
mod tests;
