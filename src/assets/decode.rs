use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::{
    error::{PanelError, PanelResult},
    math::{Fnv1a64, mul_div255_u8},
};

/// Decoded panel image: premultiplied RGBA8 plus its natural size.
///
/// `id` is a content hash so renderers can cache per-image paints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelImage {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PanelImage {
    /// Wrap already premultiplied pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> PanelResult<Self> {
        if width == 0 || height == 0 {
            return Err(PanelError::image_load("image has zero width or height"));
        }
        let expected = width as usize * height as usize * 4;
        if rgba8_premul.len() != expected {
            return Err(PanelError::image_load(format!(
                "image byte length {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        let mut h = Fnv1a64::new_default();
        h.write_u32(width);
        h.write_u32(height);
        h.write_bytes(&rgba8_premul);
        Ok(Self {
            id: h.finish(),
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Premultiply straight RGBA8 pixels.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> PanelResult<Self> {
        premultiply_rgba8_in_place(&mut rgba);
        Self::from_premul_rgba8(width, height, rgba)
    }

    /// A single-color image, handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PanelResult<Self> {
        let px = width as usize * height as usize;
        Self::from_straight_rgba8(width, height, rgba.repeat(px))
    }
}

/// Outcome of loading one panel image. A failure is data, not an error: the
/// panel falls back to its placeholder.
#[derive(Clone, Debug)]
pub enum ImageLoad {
    Loaded(PanelImage),
    Failed(String),
}

impl ImageLoad {
    pub fn image(&self) -> Option<&PanelImage> {
        match self {
            ImageLoad::Loaded(img) => Some(img),
            ImageLoad::Failed(_) => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ImageLoad::Loaded(_))
    }
}

impl From<PanelResult<PanelImage>> for ImageLoad {
    fn from(r: PanelResult<PanelImage>) -> Self {
        match r {
            Ok(img) => ImageLoad::Loaded(img),
            Err(e) => ImageLoad::Failed(e.to_string()),
        }
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to premultiplied RGBA8.
pub fn decode_panel_image(bytes: &[u8]) -> PanelResult<PanelImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| PanelError::image_load(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PanelImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
///
/// The read goes through `tokio::fs` and the decode runs on the blocking pool, so the
/// calling task yields instead of stalling the executor. Needs a tokio runtime.
pub async fn load_panel_image(path: impl AsRef<Path>) -> ImageLoad {
    let path = path.as_ref();
    let result = match tokio::fs::read(path)
        .await
        .with_context(|| format!("read image '{}'", path.display()))
    {
        Ok(bytes) => decode_off_thread(bytes).await,
        Err(e) => Err(PanelError::image_load(format!("{e:#}"))),
    };
    if let Err(e) = &result {
        tracing::warn!(path = %path.display(), error = %e, "panel image failed to load");
    }
    result.into()
}

/// Decode bytes already in memory (e.g. from an upload) on the blocking pool.
pub async fn load_panel_image_bytes(bytes: Vec<u8>) -> ImageLoad {
    let result = decode_off_thread(bytes).await;
    if let Err(e) = &result {
        tracing::warn!(error = %e, "panel image failed to decode");
    }
    result.into()
}

async fn decode_off_thread(bytes: Vec<u8>) -> PanelResult<PanelImage> {
    tokio::task::spawn_blocking(move || decode_panel_image(&bytes))
        .await
        .context("image decode task")
        .map_err(|e| PanelError::image_load(format!("{e:#}")))?
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in &mut px[..3] {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }
}

/// Inverse of [`premultiply_rgba8_in_place`], rounding to nearest.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
