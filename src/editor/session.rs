use std::ops::{Deref, DerefMut};

use kurbo::{Point, Vec2};

use crate::{
    assets::decode::ImageLoad,
    assets::set::PanelImageSet,
    catalog::template::LayoutTemplate,
    config::{EngineConfig, GutterStyle},
    editor::viewport::Viewport,
    export::page::ExportedPage,
    foundation::error::{PanelError, PanelResult},
    geometry::panel::{PanelGeometry, compute_panel_geometries, panel_at},
    placement::model::{PanelPlacement, PlacementMap},
    render::backend::{FrameRGBA, RenderBackend},
    render::compile::{PageScene, RenderTarget, compile_page},
    render::plan::PagePlan,
};

/// Page-level layout lifecycle.
///
/// `NoLayoutSelected -> LayoutSelected -> Previewing -> ExportPending -> Accepted`.
/// Rejecting a pending export goes back to `Previewing` with placements intact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum SessionState {
    NoLayoutSelected,
    /// A layout was just chosen; every placement is at its default.
    LayoutSelected,
    Previewing,
    /// An export bitmap awaits accept or reject. Placement editing is locked.
    ExportPending,
    /// Terminal: the exported bitmap belongs to the caller.
    Accepted,
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    panel: usize,
    last: Point,
}

/// Editing state for one page: the chosen layout, gutter, per-panel images and
/// placements, and the current display size.
#[derive(Debug)]
pub struct EditorSession {
    config: EngineConfig,
    panel_count: usize,
    state: SessionState,
    template: Option<LayoutTemplate>,
    gutter: GutterStyle,
    geometries: Vec<PanelGeometry>,
    placements: PlacementMap,
    images: PanelImageSet,
    viewport: Viewport,
    markers_visible: bool,
    drag: Option<Drag>,
    pending: Option<ExportedPage>,
}

impl EditorSession {
    /// A page with `panel_count` panels shown in `available_width` display pixels.
    pub fn new(config: EngineConfig, panel_count: usize, available_width: f64) -> PanelResult<Self> {
        config.validate()?;
        if panel_count == 0 || panel_count > config.max_panels {
            return Err(PanelError::validation(format!(
                "panel count must be in 1..={}, got {panel_count}",
                config.max_panels
            )));
        }
        let viewport = Viewport::fit(config.canvas, available_width, config.max_display_width)?;
        Ok(Self {
            placements: PlacementMap::new(config.scale_range),
            markers_visible: config.markers_visible,
            config,
            panel_count,
            state: SessionState::NoLayoutSelected,
            template: None,
            gutter: GutterStyle::default(),
            geometries: Vec::new(),
            images: PanelImageSet::with_panel_count(panel_count),
            viewport,
            drag: None,
            pending: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::ExportPending
    }

    pub fn panel_count(&self) -> usize {
        self.panel_count
    }

    pub fn template(&self) -> Option<&LayoutTemplate> {
        self.template.as_ref()
    }

    pub fn gutter(&self) -> GutterStyle {
        self.gutter
    }

    pub fn geometries(&self) -> &[PanelGeometry] {
        &self.geometries
    }

    pub fn placements(&self) -> &PlacementMap {
        &self.placements
    }

    pub fn placement(&self, panel: usize) -> PanelPlacement {
        self.placements.get(panel)
    }

    pub fn images(&self) -> &PanelImageSet {
        &self.images
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    pub fn pending_export(&self) -> Option<&ExportedPage> {
        self.pending.as_ref()
    }

    fn ensure_open(&self) -> PanelResult<()> {
        match self.state {
            SessionState::ExportPending => Err(PanelError::busy(
                "an export is pending; accept or reject it first",
            )),
            SessionState::Accepted => Err(PanelError::validation(
                "page was accepted; start a new session to edit it",
            )),
            _ => Ok(()),
        }
    }

    fn ensure_editable(&self) -> PanelResult<()> {
        self.ensure_open()?;
        if self.template.is_none() {
            return Err(PanelError::layout("no layout selected"));
        }
        Ok(())
    }

    fn mark_previewing(&mut self) {
        if self.state == SessionState::LayoutSelected {
            self.state = SessionState::Previewing;
        }
    }

    fn rebuild_geometry(&mut self) {
        self.geometries = match &self.template {
            Some(t) => compute_panel_geometries(t, self.config.canvas, self.gutter.inset()),
            None => Vec::new(),
        };
    }

    /// Switch to `template`. Always clears every placement, even when re-selecting
    /// the current layout.
    pub fn select_layout(&mut self, template: &LayoutTemplate) -> PanelResult<()> {
        self.ensure_open()?;
        template.validate()?;
        if template.panel_count != self.panel_count {
            return Err(PanelError::layout(format!(
                "layout '{}' has {} panels, page needs {}",
                template.id, template.panel_count, self.panel_count
            )));
        }
        tracing::debug!(layout = %template.id, "layout selected, placements reset");
        self.template = Some(template.clone());
        self.placements.reset_all();
        self.drag = None;
        self.rebuild_geometry();
        self.state = SessionState::LayoutSelected;
        Ok(())
    }

    /// Changing the gutter keeps placements; previously clipped content may appear.
    pub fn set_gutter(&mut self, gutter: GutterStyle) -> PanelResult<()> {
        self.ensure_open()?;
        self.gutter = gutter.clamped(self.config.max_gutter_width);
        self.rebuild_geometry();
        Ok(())
    }

    pub fn set_display_width(&mut self, available_width: f64) -> PanelResult<()> {
        self.viewport = Viewport::fit(
            self.config.canvas,
            available_width,
            self.config.max_display_width,
        )?;
        Ok(())
    }

    pub fn set_markers_visible(&mut self, visible: bool) {
        self.markers_visible = visible;
    }

    pub fn set_image(&mut self, panel: usize, load: ImageLoad) -> PanelResult<()> {
        self.ensure_open()?;
        self.images.set(panel, load)
    }

    /// Fill panels in order from `loads`, truncating or padding with placeholders.
    pub fn set_images(&mut self, loads: impl IntoIterator<Item = ImageLoad>) -> PanelResult<()> {
        self.ensure_open()?;
        self.images = PanelImageSet::from_sequence(loads, self.panel_count);
        Ok(())
    }

    /// Panel whose clip region is under `display` (top-most wins).
    pub fn panel_at(&self, display: Point) -> Option<usize> {
        panel_at(&self.geometries, self.viewport.to_logical(display))
    }

    /// Begin dragging the image under the pointer. Panels without an image
    /// have nothing to move and are ignored.
    pub fn pointer_down(&mut self, display: Point) -> PanelResult<Option<usize>> {
        self.ensure_editable()?;
        self.drag = None;
        let Some(panel) = self.panel_at(display) else {
            return Ok(None);
        };
        if self.images.image(panel).is_none() {
            return Ok(None);
        }
        self.drag = Some(Drag {
            panel,
            last: display,
        });
        Ok(Some(panel))
    }

    /// Apply pointer movement since the last event, converted to logical units.
    pub fn pointer_move(&mut self, display: Point) -> PanelResult<()> {
        self.ensure_editable()?;
        let Some(drag) = self.drag.as_mut() else {
            return Ok(());
        };
        let delta = self.viewport.delta_to_logical(display - drag.last);
        drag.last = display;
        let panel = drag.panel;
        self.placements.adjust_offset(panel, delta.x, delta.y);
        self.mark_previewing();
        Ok(())
    }

    pub fn pointer_up(&mut self, display: Point) -> PanelResult<()> {
        self.pointer_move(display)?;
        self.drag = None;
        Ok(())
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Move `panel`'s image by a display-space delta.
    pub fn drag_panel(&mut self, panel: usize, display_delta: Vec2) -> PanelResult<()> {
        self.ensure_editable()?;
        self.check_panel(panel)?;
        let d = self.viewport.delta_to_logical(display_delta);
        self.placements.adjust_offset(panel, d.x, d.y);
        self.mark_previewing();
        Ok(())
    }

    pub fn set_scale(&mut self, panel: usize, value: f64) -> PanelResult<()> {
        self.ensure_editable()?;
        self.check_panel(panel)?;
        self.placements.set_scale(panel, value);
        self.mark_previewing();
        Ok(())
    }

    pub fn reset_panel(&mut self, panel: usize) -> PanelResult<()> {
        self.ensure_editable()?;
        self.check_panel(panel)?;
        self.placements.reset_panel(panel);
        self.mark_previewing();
        Ok(())
    }

    pub fn reset_all(&mut self) -> PanelResult<()> {
        self.ensure_editable()?;
        self.placements.reset_all();
        self.mark_previewing();
        Ok(())
    }

    /// Replace placements wholesale, e.g. when reopening a saved page.
    pub fn restore_placements(
        &mut self,
        entries: impl IntoIterator<Item = (usize, PanelPlacement)>,
    ) -> PanelResult<()> {
        self.ensure_editable()?;
        self.placements.reset_all();
        for (panel, p) in entries {
            self.check_panel(panel)?;
            self.placements.insert(panel, p);
        }
        self.mark_previewing();
        Ok(())
    }

    fn check_panel(&self, panel: usize) -> PanelResult<()> {
        if panel >= self.panel_count {
            return Err(PanelError::validation(format!(
                "panel {panel} out of range (0..{})",
                self.panel_count
            )));
        }
        Ok(())
    }

    fn scene(&self) -> PageScene<'_> {
        PageScene {
            canvas: self.config.canvas,
            geometries: &self.geometries,
            placements: &self.placements,
            images: &self.images,
            gutter_color: self.gutter.color,
            placeholder_color: self.config.placeholder_color,
            markers: self.markers_visible.then_some(&self.config.marker),
        }
    }

    /// Draw ops for the on-screen preview at the current display size.
    pub fn preview_plan(&self) -> PanelResult<PagePlan> {
        if self.template.is_none() {
            return Err(PanelError::layout("no layout selected"));
        }
        let target = RenderTarget::at_scale(self.config.canvas, self.viewport.scale())?;
        Ok(compile_page(&self.scene(), target))
    }

    pub fn preview(&mut self, backend: &mut dyn RenderBackend) -> PanelResult<FrameRGBA> {
        let plan = self.preview_plan()?;
        let frame = backend.render_plan(&plan)?;
        self.mark_previewing();
        Ok(frame)
    }

    /// Rasterize the page at the canvas resolution without markers.
    ///
    /// Markers are hidden for the duration and restored on every exit path. On
    /// failure the session stays in `Previewing` with placements untouched, so the
    /// export can be retried.
    #[tracing::instrument(level = "info", skip(self, backend), fields(layout = ?self.template.as_ref().map(|t| &t.id)))]
    pub fn export(&mut self, backend: &mut dyn RenderBackend) -> PanelResult<()> {
        self.ensure_editable()?;
        self.drag = None;

        let target_width = self.config.canvas.width;
        let pixel_ratio = self.viewport.pixel_ratio(target_width);
        let result = {
            let hidden = HiddenMarkers::new(self);
            hidden.rasterize(backend, pixel_ratio)
        };

        match result {
            Ok(frame) => {
                let layout_id = self
                    .template
                    .as_ref()
                    .map(|t| t.id.clone())
                    .unwrap_or_default();
                self.pending = Some(ExportedPage {
                    layout_id,
                    pixel_ratio,
                    frame,
                });
                self.state = SessionState::ExportPending;
                tracing::info!(pixel_ratio, "page exported");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed, page left editable");
                self.state = SessionState::Previewing;
                Err(match e {
                    PanelError::Render(_) | PanelError::Export(_) => e,
                    other => PanelError::export(other.to_string()),
                })
            }
        }
    }

    /// Hand over the pending bitmap and end the session.
    pub fn accept(&mut self) -> PanelResult<ExportedPage> {
        if self.state != SessionState::ExportPending {
            return Err(PanelError::validation("no export is pending"));
        }
        let page = self
            .pending
            .take()
            .ok_or_else(|| PanelError::export("pending export is missing"))?;
        self.state = SessionState::Accepted;
        Ok(page)
    }

    /// Discard the pending bitmap and resume editing.
    ///
    /// This is the `Rejected` transition: there is no separate state for it, the
    /// session lands back in [`SessionState::Previewing`] with placements intact.
    pub fn reject(&mut self) -> PanelResult<()> {
        if self.state != SessionState::ExportPending {
            return Err(PanelError::validation("no export is pending"));
        }
        self.pending = None;
        self.state = SessionState::Previewing;
        Ok(())
    }
}

/// Hides the marker group while alive.
struct HiddenMarkers<'a> {
    session: &'a mut EditorSession,
    restore: bool,
}

impl<'a> HiddenMarkers<'a> {
    fn new(session: &'a mut EditorSession) -> Self {
        let restore = session.markers_visible;
        session.markers_visible = false;
        Self { session, restore }
    }

    fn rasterize(&self, backend: &mut dyn RenderBackend, pixel_ratio: f64) -> PanelResult<FrameRGBA> {
        let scale = self.viewport.scale() * pixel_ratio;
        let target = RenderTarget::at_scale(self.config.canvas, scale)?;
        let plan = compile_page(&self.scene(), target);
        backend.render_plan(&plan)
    }
}

impl Deref for HiddenMarkers<'_> {
    type Target = EditorSession;

    fn deref(&self) -> &EditorSession {
        self.session
    }
}

impl DerefMut for HiddenMarkers<'_> {
    fn deref_mut(&mut self) -> &mut EditorSession {
        self.session
    }
}

impl Drop for HiddenMarkers<'_> {
    fn drop(&mut self) {
        self.session.markers_visible = self.restore;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
