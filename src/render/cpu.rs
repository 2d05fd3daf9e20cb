use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    assets::decode::PanelImage,
    foundation::core::{Affine, BezPath, Point, Rgba8Premul},
    foundation::error::{PanelError, PanelResult},
    render::backend::{FrameRGBA, OpBackend, RenderBackend, RenderSettings},
    render::plan::{DrawOp, PagePlan, device_clip_path},
};

const IMAGE_CACHE_CAPACITY: usize = 32;

/// Software rasterizer on top of `vello_cpu`.
pub struct CpuBackend {
    settings: RenderSettings,
    image_cache: HashMap<u64, vello_cpu::Image>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            image_cache: HashMap::new(),
            ctx: None,
        }
    }

    fn image_paint_for(&mut self, image: &PanelImage) -> PanelResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&image.id) {
            return Ok(paint.clone());
        }

        let pixmap =
            image_premul_bytes_to_pixmap(image.rgba8_premul.as_slice(), image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        if self.image_cache.len() >= IMAGE_CACHE_CAPACITY {
            self.image_cache.clear();
        }
        self.image_cache.insert(image.id, paint.clone());
        Ok(paint)
    }
}

impl OpBackend for CpuBackend {
    fn begin_page(&mut self, plan: &PagePlan) -> PanelResult<()> {
        let width: u16 = plan
            .size
            .width
            .try_into()
            .map_err(|_| PanelError::render("page width exceeds u16"))?;
        let height: u16 = plan
            .size
            .height
            .try_into()
            .map_err(|_| PanelError::render("page height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }
        self.ctx = Some(ctx);
        Ok(())
    }

    fn exec_op(&mut self, op: &DrawOp) -> PanelResult<()> {
        let mut ctx = self
            .ctx
            .take()
            .ok_or_else(|| PanelError::render("exec_op called before begin_page"))?;
        let out = draw_op(self, &mut ctx, op);
        self.ctx = Some(ctx);
        out
    }

    fn readback_rgba8(&mut self, plan: &PagePlan) -> PanelResult<FrameRGBA> {
        let ctx = self
            .ctx
            .as_mut()
            .ok_or_else(|| PanelError::render("readback called before begin_page"))?;
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(ctx.width(), ctx.height());
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.size.width,
            height: plan.size.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl RenderBackend for CpuBackend {}

fn draw_op(
    backend: &mut CpuBackend,
    ctx: &mut vello_cpu::RenderContext,
    op: &DrawOp,
) -> PanelResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::FillPath {
            path,
            transform,
            color,
        } => {
            ctx.set_transform(affine_to_cpu(*transform));
            ctx.set_paint(paint_color(*color));
            ctx.fill_path(&bezpath_to_cpu(path));
        }
        DrawOp::PanelImage {
            clip,
            clip_transform,
            image,
            transform,
            ..
        } => {
            let paint = backend.image_paint_for(image)?;
            with_clip(ctx, clip, *clip_transform, |ctx| {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(image.width),
                    f64::from(image.height),
                ));
            });
        }
        DrawOp::Placeholder {
            clip,
            clip_transform,
            color,
            ..
        } => {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(paint_color(*color));
            ctx.fill_path(&bezpath_to_cpu(&device_clip_path(clip, *clip_transform)));
        }
        DrawOp::Marker {
            clip,
            transform,
            badge,
            digits,
            fill,
            ink,
            ..
        } => {
            with_clip(ctx, clip, *transform, |ctx| {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint_color(*fill));
                ctx.fill_path(&bezpath_to_cpu(badge));
                ctx.set_paint(paint_color(*ink));
                ctx.fill_path(&bezpath_to_cpu(digits));
            });
        }
    }
    Ok(())
}

/// Run `f` inside a clip layer shaped like `clip` (logical points mapped by `transform`).
fn with_clip(
    ctx: &mut vello_cpu::RenderContext,
    clip: &[Point],
    transform: Affine,
    f: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    if clip.len() < 3 {
        return;
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.push_clip_layer(&bezpath_to_cpu(&device_clip_path(clip, transform)));
    f(ctx);
    ctx.pop_layer();
}

fn paint_color(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let unpremul = |v: u8| -> u8 {
        if c.a == 0 {
            0
        } else {
            ((u16::from(v) * 255 + u16::from(c.a) / 2) / u16::from(c.a)).min(255) as u8
        }
    };
    vello_cpu::peniko::Color::from_rgba8(unpremul(c.r), unpremul(c.g), unpremul(c.b), c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> PanelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PanelError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PanelError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PanelError::render("panel image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
