use std::path::Path;
use std::sync::Arc;

use kurbo::Shape;

use crate::assets::decode::PosterImage;
use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::backend::{FrameRGBA, PosterRenderer};
use crate::render::blur::shadow_mask;
use crate::render::plan::{DrawOp, DropShadow, Paint, PosterPlan, StrokeSpec, TextAlign};
use crate::text::engine::{ApproxMetrics, FontSpec, TextLayoutEngine, TextMeasure};

const STROKE_TOLERANCE: f64 = 0.1;

/// CPU raster backend powered by `vello_cpu`.
///
/// Without a font, text is measured with [`ApproxMetrics`] and glyphs are not drawn.
pub struct CpuBackend {
    text: Option<TextLayoutEngine>,
    font: Option<vello_cpu::peniko::FontData>,
    ctx: Option<vello_cpu::RenderContext>,
    image_cache: Option<CachedImage>,
    shadow_cache: Option<CachedShadow>,
    warned_no_font: bool,
}

struct CachedImage {
    source: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ShadowKey {
    dest_w: f64,
    dest_h: f64,
    color: Rgba8,
    blur: f64,
}

struct CachedShadow {
    source: Arc<Vec<u8>>,
    key: ShadowKey,
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
    pad: u32,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("text", &self.text)
            .field("has_context", &self.ctx.is_some())
            .finish()
    }
}

impl CpuBackend {
    pub fn new(text: Option<TextLayoutEngine>) -> Self {
        let font = text.as_ref().map(|engine| {
            let f = engine.font();
            vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(f.data.as_ref().clone()),
                f.index,
            )
        });
        Self {
            text,
            font,
            ctx: None,
            image_cache: None,
            shadow_cache: None,
            warned_no_font: false,
        }
    }

    /// Use the system sans-serif face, degrading to approximate metrics if none loads.
    pub fn with_system_font() -> Self {
        match TextLayoutEngine::discover(None) {
            Ok(engine) => Self::new(engine),
            Err(err) => {
                tracing::warn!(error = %err, "system font unusable; text will not be drawn");
                Self::new(None)
            }
        }
    }

    /// Use an explicit font file.
    pub fn with_font_path(path: &Path) -> PosterResult<Self> {
        Ok(Self::new(TextLayoutEngine::discover(Some(path))?))
    }

    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    pub fn font_family(&self) -> Option<&str> {
        self.text.as_ref().map(TextLayoutEngine::family_name)
    }

    fn warn_no_font(&mut self) {
        if !self.warned_no_font {
            tracing::warn!("no font available; using approximate metrics and skipping glyphs");
            self.warned_no_font = true;
        }
    }

    fn take_context(&mut self, width: u16, height: u16) -> vello_cpu::RenderContext {
        match self.ctx.take() {
            Some(mut ctx) if ctx.width() == width && ctx.height() == height => {
                ctx.reset();
                ctx
            }
            _ => vello_cpu::RenderContext::new(width, height),
        }
    }

    fn draw_op(&mut self, ctx: &mut vello_cpu::RenderContext, op: &DrawOp) -> PosterResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Clear { color } => {
                // A fresh or reset context is already transparent.
                if color.a == 0 {
                    return Ok(());
                }
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(solid(*color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(ctx.width()),
                    f64::from(ctx.height()),
                ));
                Ok(())
            }
            DrawOp::FillPath {
                path,
                paint,
                opacity,
                transform,
            } => {
                let cpu_path = bezpath_to_cpu(path);
                ctx.set_transform(affine_to_cpu(*transform));
                if let Paint::Solid(c) = paint {
                    ctx.set_paint(solid(c.scale_alpha(*opacity)));
                    ctx.fill_path(&cpu_path);
                    return Ok(());
                }

                let Some((image, origin)) =
                    bake_paint(paint, path.bounding_box(), *transform, ctx.width(), ctx.height())?
                else {
                    return Ok(());
                };
                ctx.set_paint(image);
                ctx.set_paint_transform(affine_to_cpu(
                    transform.inverse() * Affine::translate(origin.to_vec2()),
                ));
                with_opacity(ctx, *opacity, |ctx| ctx.fill_path(&cpu_path));
                Ok(())
            }
            DrawOp::StrokePath {
                path,
                color,
                stroke,
                opacity,
                transform,
            } => {
                let outline = stroke_outline(path, stroke);
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(solid(color.scale_alpha(*opacity)));
                ctx.fill_path(&bezpath_to_cpu(&outline));
                Ok(())
            }
            DrawOp::Image {
                image,
                dest,
                shadow,
                opacity,
                transform,
            } => {
                if dest.width() <= 0.0 || dest.height() <= 0.0 {
                    return Ok(());
                }
                if let Some(shadow) = shadow {
                    self.draw_shadow(ctx, image, *dest, shadow, *opacity, *transform)?;
                }

                let paint = self.image_paint(image)?;
                let (iw, ih) = (f64::from(image.width), f64::from(image.height));
                let placed = *transform
                    * Affine::translate((dest.x0, dest.y0))
                    * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);
                ctx.set_transform(affine_to_cpu(placed));
                ctx.set_paint(paint);
                with_opacity(ctx, *opacity, |ctx| {
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
                });
                Ok(())
            }
            DrawOp::Text {
                text,
                origin,
                align,
                font,
                color,
                opacity,
                transform,
            } => self.draw_text(
                ctx,
                text,
                *origin,
                *align,
                *font,
                color.scale_alpha(*opacity),
                *transform,
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        origin: Point,
        align: TextAlign,
        font: FontSpec,
        color: Rgba8,
        transform: Affine,
    ) -> PosterResult<()> {
        if self.text.is_none() || self.font.is_none() {
            self.warn_no_font();
            return Ok(());
        }
        let (Some(engine), Some(font_data)) = (self.text.as_mut(), self.font.as_ref()) else {
            return Ok(());
        };

        let layout = engine.layout_line(text, font, color)?;
        let dx = align.offset(f64::from(layout.width()));
        let x0 = (origin.x + dx) as f32;
        let Some(first_baseline) = layout.lines().next().map(|l| l.metrics().baseline) else {
            return Ok(());
        };
        let y0 = origin.y as f32 - first_baseline;

        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(solid(color));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: x0 + g.x,
                    y: y0 + g.y,
                });
                ctx.glyph_run(font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn draw_shadow(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        image: &PosterImage,
        dest: Rect,
        shadow: &DropShadow,
        opacity: f32,
        transform: Affine,
    ) -> PosterResult<()> {
        if shadow.color.a == 0 {
            return Ok(());
        }
        // Shadows are built in device space; blur and offset follow the canvas scale.
        let device = transform.transform_rect_bbox(dest);
        let offset = transform * Point::new(shadow.offset.x, shadow.offset.y)
            - transform * Point::ZERO;
        let scale = transform.determinant().abs().sqrt();
        let key = ShadowKey {
            dest_w: device.width(),
            dest_h: device.height(),
            color: shadow.color,
            blur: shadow.blur * scale,
        };

        let cached = self
            .shadow_cache
            .as_ref()
            .is_some_and(|c| c.key == key && Arc::ptr_eq(&c.source, &image.rgba8_premul));
        if !cached {
            let mask = shadow_mask(image, key.dest_w, key.dest_h, key.color, key.blur)?;
            let pixmap = image_premul_bytes_to_pixmap(&mask.rgba8_premul, mask.width, mask.height)?;
            self.shadow_cache = Some(CachedShadow {
                source: image.rgba8_premul.clone(),
                key,
                paint: pixmap_paint(pixmap),
                width: mask.width,
                height: mask.height,
                pad: mask.pad,
            });
        }
        let Some(s) = self.shadow_cache.as_ref() else {
            return Ok(());
        };

        let inner_w = f64::from(s.width - 2 * s.pad);
        let inner_h = f64::from(s.height - 2 * s.pad);
        let sx = key.dest_w / inner_w;
        let sy = key.dest_h / inner_h;
        let pad = f64::from(s.pad);
        let placed = Affine::translate((
            device.x0 + offset.x - pad * sx,
            device.y0 + offset.y - pad * sy,
        )) * Affine::scale_non_uniform(sx, sy);

        ctx.set_transform(affine_to_cpu(placed));
        ctx.set_paint(s.paint.clone());
        let rect = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(s.width), f64::from(s.height));
        with_opacity(ctx, opacity, |ctx| ctx.fill_rect(&rect));
        Ok(())
    }

    fn image_paint(&mut self, image: &PosterImage) -> PosterResult<vello_cpu::Image> {
        if let Some(c) = &self.image_cache
            && Arc::ptr_eq(&c.source, &image.rgba8_premul)
        {
            return Ok(c.paint.clone());
        }
        let pixmap = image_premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
        let paint = pixmap_paint(pixmap);
        self.image_cache = Some(CachedImage {
            source: image.rgba8_premul.clone(),
            paint: paint.clone(),
        });
        Ok(paint)
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TextMeasure for CpuBackend {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        match self.text.as_mut() {
            Some(engine) => engine.measure(text, font),
            None => {
                self.warn_no_font();
                ApproxMetrics.measure(text, font)
            }
        }
    }
}

impl PosterRenderer for CpuBackend {
    #[tracing::instrument(
        skip_all,
        fields(width = plan.pixel_width, height = plan.pixel_height, ops = plan.ops.len())
    )]
    fn render_plan(&mut self, plan: &PosterPlan) -> PosterResult<FrameRGBA> {
        let width: u16 = plan
            .pixel_width
            .try_into()
            .map_err(|_| PosterError::render("frame width exceeds u16"))?;
        let height: u16 = plan
            .pixel_height
            .try_into()
            .map_err(|_| PosterError::render("frame height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(PosterError::render("frame must be non-empty"));
        }

        let mut ctx = self.take_context(width, height);
        let drawn = plan
            .ops
            .iter()
            .try_for_each(|op| self.draw_op(&mut ctx, op));
        if let Err(err) = drawn {
            self.ctx = Some(ctx);
            return Err(err);
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(FrameRGBA {
            width: plan.pixel_width,
            height: plan.pixel_height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn text_measure(&mut self) -> &mut dyn TextMeasure {
        self
    }
}

fn solid(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    draw(ctx);
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn stroke_outline(path: &BezPath, stroke: &StrokeSpec) -> BezPath {
    let mut style = kurbo::Stroke::new(stroke.width)
        .with_caps(kurbo::Cap::Butt)
        .with_join(kurbo::Join::Miter);
    if !stroke.dash.is_empty() {
        style = style.with_dashes(0.0, stroke.dash.iter().copied());
    }
    kurbo::stroke(
        path.iter(),
        &style,
        &kurbo::StrokeOpts::default(),
        STROKE_TOLERANCE,
    )
}

/// Rasterize a gradient over the device-space bounds of a fill.
///
/// Returns the image and its device-space origin, or `None` when the fill is off-surface.
fn bake_paint(
    paint: &Paint,
    bounds: Rect,
    transform: Affine,
    surface_w: u16,
    surface_h: u16,
) -> PosterResult<Option<(vello_cpu::Image, Point)>> {
    let device = transform.transform_rect_bbox(bounds);
    let x0 = device.x0.floor().max(0.0);
    let y0 = device.y0.floor().max(0.0);
    let x1 = device.x1.ceil().min(f64::from(surface_w));
    let y1 = device.y1.ceil().min(f64::from(surface_h));
    if x1 <= x0 || y1 <= y0 {
        return Ok(None);
    }
    let (w, h) = ((x1 - x0) as u32, (y1 - y0) as u32);
    let inverse = transform.inverse();

    let mut bytes = vec![0u8; (w as usize) * (h as usize) * 4];
    for y in 0..h {
        for x in 0..w {
            let p = inverse * Point::new(x0 + f64::from(x) + 0.5, y0 + f64::from(y) + 0.5);
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&paint.color_at(p).to_premul());
        }
    }
    let pixmap = image_premul_bytes_to_pixmap(&bytes, w, h)?;
    Ok(Some((pixmap_paint(pixmap), Point::new(x0, y0))))
}

fn pixmap_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
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
) -> PosterResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PosterError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PosterError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(PosterError::render("image byte length mismatch"));
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
