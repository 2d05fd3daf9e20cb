use crate::{
    assets::decode::{ImageLoad, PanelImage},
    foundation::error::{PanelError, PanelResult},
};

/// One image slot per panel. Empty slots and failed loads render as placeholders.
#[derive(Clone, Debug, Default)]
pub struct PanelImageSet {
    slots: Vec<Option<ImageLoad>>,
}

impl PanelImageSet {
    pub fn with_panel_count(panel_count: usize) -> Self {
        Self {
            slots: vec![None; panel_count],
        }
    }

    /// Fill the first panels in order. Extra images are dropped and missing ones
    /// leave placeholders; neither is an error.
    pub fn from_sequence(loads: impl IntoIterator<Item = ImageLoad>, panel_count: usize) -> Self {
        let mut slots: Vec<Option<ImageLoad>> = loads.into_iter().map(Some).collect();
        if slots.len() > panel_count {
            tracing::debug!(
                supplied = slots.len(),
                panel_count,
                "more images than panels, dropping the rest"
            );
        } else if slots.len() < panel_count {
            tracing::debug!(
                supplied = slots.len(),
                panel_count,
                "fewer images than panels, remaining panels get placeholders"
            );
        }
        slots.resize(panel_count, None);
        Self { slots }
    }

    pub fn panel_count(&self) -> usize {
        self.slots.len()
    }

    pub fn set(&mut self, panel: usize, load: ImageLoad) -> PanelResult<()> {
        let n = self.slots.len();
        let slot = self
            .slots
            .get_mut(panel)
            .ok_or_else(|| PanelError::validation(format!("panel {panel} out of range (0..{n})")))?;
        if let ImageLoad::Failed(reason) = &load {
            tracing::warn!(panel, reason = %reason, "panel image unavailable, using placeholder");
        }
        *slot = Some(load);
        Ok(())
    }

    pub fn load(&self, panel: usize) -> Option<&ImageLoad> {
        self.slots.get(panel).and_then(Option::as_ref)
    }

    /// The decoded image for `panel`, if one loaded successfully.
    pub fn image(&self, panel: usize) -> Option<&PanelImage> {
        self.load(panel).and_then(ImageLoad::image)
    }

    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.as_ref().is_some_and(ImageLoad::is_loaded))
            .count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/set.rs"]
mod tests;
