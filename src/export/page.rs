use std::io::Cursor;
use std::path::Path;

use anyhow::Context;

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    editor::session::EditorSession,
    foundation::error::{PanelError, PanelResult},
    render::backend::{FrameRGBA, RenderBackend},
};

/// A decoration-free page bitmap at the logical canvas resolution.
#[derive(Clone, Debug)]
pub struct ExportedPage {
    pub layout_id: String,
    /// Export width divided by the display width at the time of export.
    pub pixel_ratio: f64,
    pub frame: FrameRGBA,
}

impl ExportedPage {
    pub fn width(&self) -> u32 {
        self.frame.width
    }

    pub fn height(&self) -> u32 {
        self.frame.height
    }

    /// Straight-alpha RGBA8 pixels.
    pub fn straight_rgba8(&self) -> Vec<u8> {
        let mut data = self.frame.data.clone();
        if self.frame.premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        data
    }

    pub fn to_png(&self) -> PanelResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width(), self.height(), self.straight_rgba8())
            .ok_or_else(|| PanelError::export("frame size does not match pixel data"))?;
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode page png")
            .map_err(|e| PanelError::export(format!("{e:#}")))?;
        Ok(buf)
    }

    pub fn write_png(&self, path: &Path) -> PanelResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.straight_rgba8(),
            self.width(),
            self.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))
        .map_err(|e| PanelError::export(format!("{e:#}")))
    }
}

/// Export and accept each page in turn. Every page finishes its hide, rasterize,
/// restore cycle before the next starts; a failed page does not stop the rest.
pub fn export_pages<'a>(
    sessions: impl IntoIterator<Item = &'a mut EditorSession>,
    backend: &mut dyn RenderBackend,
) -> Vec<PanelResult<ExportedPage>> {
    sessions
        .into_iter()
        .enumerate()
        .map(|(i, session)| {
            let result = session.export(backend).and_then(|()| session.accept());
            if let Err(e) = &result {
                tracing::warn!(page = i, error = %e, "page export failed");
            }
            result
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/export/page.rs"]
mod tests;
