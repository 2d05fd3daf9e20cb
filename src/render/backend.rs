use crate::{
    foundation::error::{PanelError, PanelResult},
    render::plan::{DrawOp, PagePlan},
};

/// A rendered page as RGBA8 pixels.
///
/// Backends produce premultiplied alpha; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Low-level op sink driven by [`execute_plan`].
pub trait OpBackend {
    fn begin_page(&mut self, plan: &PagePlan) -> PanelResult<()>;

    fn exec_op(&mut self, op: &DrawOp) -> PanelResult<()>;

    fn readback_rgba8(&mut self, plan: &PagePlan) -> PanelResult<FrameRGBA>;
}

pub fn execute_plan<B: OpBackend + ?Sized>(
    backend: &mut B,
    plan: &PagePlan,
) -> PanelResult<FrameRGBA> {
    if plan.size.width == 0 || plan.size.height == 0 {
        return Err(PanelError::render("page plan has zero size"));
    }
    backend.begin_page(plan)?;
    for op in &plan.ops {
        backend.exec_op(op)?;
    }
    backend.readback_rgba8(plan)
}

/// A renderer that turns a [`PagePlan`] into a [`FrameRGBA`].
pub trait RenderBackend: OpBackend {
    fn render_plan(&mut self, plan: &PagePlan) -> PanelResult<FrameRGBA> {
        execute_plan(self, plan)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// If set, the page is cleared to this straight RGBA8 color before drawing.
    pub clear_rgba: Option<[u8; 4]>,
}

pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> PanelResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
