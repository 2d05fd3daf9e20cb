use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::decode::load_panel_image,
    catalog::library::LayoutCatalog,
    config::{EngineConfig, GutterStyle},
    editor::session::EditorSession,
    foundation::error::{PanelError, PanelResult},
    placement::model::PanelPlacement,
};

fn default_display_width() -> f64 {
    400.0
}

/// A saved page: which layout, which images in panel order, and how each image
/// was placed.
///
/// ```json
/// {
///   "layout": "four-grid",
///   "gutter": { "color": "#000000", "width_px": 4 },
///   "images": ["a.png", "b.jpg"],
///   "placements": { "0": { "offset_x": 12, "offset_y": -30, "scale": 1.2 } }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageDocument {
    pub layout: String,
    #[serde(default)]
    pub gutter: GutterStyle,
    /// Image files, relative to the document's directory. Extra entries are
    /// ignored; missing ones leave placeholders.
    #[serde(default)]
    pub images: Vec<PathBuf>,
    #[serde(default)]
    pub placements: BTreeMap<usize, PanelPlacement>,
    #[serde(default = "default_display_width")]
    pub display_width: f64,
}

impl PageDocument {
    pub fn from_json_str(s: &str) -> PanelResult<Self> {
        serde_json::from_str(s).map_err(|e| PanelError::serde(e.to_string()))
    }

    pub fn from_path(path: &Path) -> PanelResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read page document '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn to_json_string(&self) -> PanelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PanelError::serde(e.to_string()))
    }

    /// Snapshot an open session. `images` are the paths the session's images
    /// were loaded from.
    pub fn capture(session: &EditorSession, images: Vec<PathBuf>) -> PanelResult<Self> {
        let layout = session
            .template()
            .map(|t| t.id.clone())
            .ok_or_else(|| PanelError::layout("no layout selected"))?;
        Ok(Self {
            layout,
            gutter: session.gutter(),
            images,
            placements: session
                .placements()
                .iter()
                .map(|(i, p)| (i, *p))
                .collect(),
            display_width: session.viewport().display_width(),
        })
    }

    /// Rebuild an editor session. Images load concurrently; unreadable ones become
    /// placeholders.
    pub async fn open(
        &self,
        catalog: &LayoutCatalog,
        config: EngineConfig,
        base_dir: &Path,
    ) -> PanelResult<EditorSession> {
        let template = catalog.require(&self.layout)?;
        let mut session = EditorSession::new(config, template.panel_count, self.display_width)?;
        session.select_layout(template)?;
        session.set_gutter(self.gutter)?;

        let loads = futures::future::join_all(
            self.images
                .iter()
                .take(template.panel_count)
                .map(|path| load_panel_image(base_dir.join(path))),
        )
        .await;
        session.set_images(loads)?;

        if !self.placements.is_empty() {
            session.restore_placements(self.placements.iter().map(|(i, p)| (*i, *p)))?;
        }
        Ok(session)
    }
}

#[cfg(test)]
#[path = "../tests/unit/document.rs"]
mod tests;
