//! Poster layout: turns a [`PosterScene`] into a [`PosterPlan`].
//!
//! All coordinates are in logical canvas units; the plan's ops carry the
//! device-pixel-ratio scale as their transform.

use std::sync::Arc;

use crate::assets::decode::PosterImage;
use crate::foundation::core::{Affine, CanvasSize, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{PosterError, PosterResult};
use crate::poster::form::{BulletList, PosterForm};
use crate::render::pattern::draw_pattern;
use crate::render::plan::{DropShadow, Paint, PlanBuilder, PosterPlan, TextAlign};
use crate::render::shapes::{circle, ellipse, rounded_rect};
use crate::style::catalog::{ImageAlignment, LayoutKind, StylePreset};
use crate::text::engine::{FontSpec, TextMeasure};
use crate::text::wrap::{WrappedText, wrap_lines};

pub const MAX_DEVICE_PIXEL_RATIO: f64 = 4.0;

const VIGNETTE_TOP: Rgba8 = Rgba8::new(2, 6, 23, 0);
const VIGNETTE_BOTTOM: Rgba8 = Rgba8::new(2, 6, 23, 140);
const DESCRIPTION_COLOR: Rgba8 = Rgba8::new(226, 232, 240, 179);
const ORB_ALPHA: u8 = 0x33;
const SHADOW_BLUR: f64 = 80.0;
const SHADOW_OFFSET_Y: f64 = 48.0;
const FILL_ALPHA: f32 = 0.92;
const CTA_ALPHA: f32 = 0.96;
const CTA_PADDING_X: f64 = 44.0;
const CTA_HEIGHT: f64 = 74.0;
const CTA_MIN_WIDTH: f64 = 320.0;
const DEFAULT_CTA: &str = "Shop now";

/// Everything a single poster render depends on.
#[derive(Clone, Debug)]
pub struct PosterScene {
    pub style: StylePreset,
    pub form: PosterForm,
    pub bullets: BulletList,
    pub image: Option<Arc<PosterImage>>,
    /// Accent label drawn when `form.accent` is empty.
    pub fallback_accent: String,
}

/// Output surface parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub canvas: CanvasSize,
    pub device_pixel_ratio: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::POSTER,
            device_pixel_ratio: 1.0,
        }
    }
}

impl RenderSettings {
    pub fn with_device_pixel_ratio(device_pixel_ratio: f64) -> Self {
        Self {
            device_pixel_ratio,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> PosterResult<()> {
        self.pixel_size().map(|_| ())
    }

    /// Device pixel dimensions of the output surface.
    pub fn pixel_size(&self) -> PosterResult<(u32, u32)> {
        let dpr = self.device_pixel_ratio;
        if !dpr.is_finite() || dpr <= 0.0 || dpr > MAX_DEVICE_PIXEL_RATIO {
            return Err(PosterError::validation(format!(
                "device_pixel_ratio must be in (0, {MAX_DEVICE_PIXEL_RATIO}], got {dpr}"
            )));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PosterError::validation("canvas size must be non-zero"));
        }
        let w = (self.canvas.width_f64() * dpr).round();
        let h = (self.canvas.height_f64() * dpr).round();
        if w < 1.0 || h < 1.0 {
            return Err(PosterError::validation("scaled canvas is smaller than one pixel"));
        }
        if w > f64::from(u16::MAX) || h > f64::from(u16::MAX) {
            return Err(PosterError::validation(format!(
                "scaled canvas {w}x{h} exceeds {} px",
                u16::MAX
            )));
        }
        Ok((w as u32, h as u32))
    }
}

/// Lay out the poster. Only invalid `settings` make this fail.
#[tracing::instrument(
    skip_all,
    fields(style = %scene.style.id, dpr = settings.device_pixel_ratio)
)]
pub fn compose_poster(
    scene: &PosterScene,
    measure: &mut dyn TextMeasure,
    settings: &RenderSettings,
) -> PosterResult<PosterPlan> {
    let (pixel_width, pixel_height) = settings.pixel_size()?;
    let mut c = Composer {
        b: PlanBuilder::new(Affine::scale(settings.device_pixel_ratio)),
        measure,
        scene,
        w: settings.canvas.width_f64(),
        h: settings.canvas.height_f64(),
    };

    c.background(settings.canvas);
    c.vignette();
    c.accent_orb();
    c.product_image();
    c.accent_pill();
    let bullets_y = c.text_blocks();
    c.bullets(bullets_y);
    c.cta();
    c.price_badge();

    let plan = c.b.finish(
        settings.canvas,
        settings.device_pixel_ratio,
        pixel_width,
        pixel_height,
    );
    tracing::debug!(ops = plan.ops.len(), "composed poster plan");
    Ok(plan)
}

/// Draw each wrapped line at `x` using the builder's current alignment.
pub fn fill_wrapped_text(b: &mut PlanBuilder, wrapped: &WrappedText, x: f64) {
    for line in &wrapped.lines {
        b.fill_text(line.text.clone(), x, line.y);
    }
}

struct Composer<'a> {
    b: PlanBuilder,
    measure: &'a mut dyn TextMeasure,
    scene: &'a PosterScene,
    w: f64,
    h: f64,
}

struct TextColumn {
    align: TextAlign,
    x: f64,
    width: f64,
}

impl Composer<'_> {
    fn style(&self) -> &StylePreset {
        &self.scene.style
    }

    fn column(&self) -> TextColumn {
        if self.style().layout.is_left_aligned() {
            TextColumn {
                align: TextAlign::Left,
                x: self.w * 0.1,
                width: self.w * 0.46,
            }
        } else {
            TextColumn {
                align: TextAlign::Center,
                x: self.w / 2.0,
                width: self.w * 0.72,
            }
        }
    }

    fn background(&mut self, canvas: CanvasSize) {
        let (w, h) = (self.w, self.h);
        let stops = self.style().palette.gradient;
        self.b.clear(Rgba8::TRANSPARENT);
        self.b.scoped(|b| {
            b.set_fill(Paint::Linear {
                start: Point::ZERO,
                end: Point::new(w, h),
                stops,
            });
            b.fill_rect(Rect::new(0.0, 0.0, w, h));
        });
        draw_pattern(&mut self.b, &self.scene.style, canvas);
    }

    fn vignette(&mut self) {
        let (w, h) = (self.w, self.h);
        self.b.scoped(|b| {
            b.set_fill(Paint::Linear {
                start: Point::new(0.0, h * 0.45),
                end: Point::new(0.0, h),
                stops: [VIGNETTE_TOP, VIGNETTE_BOTTOM],
            });
            b.fill_rect(Rect::new(0.0, h * 0.45, w, h));
        });
    }

    fn accent_orb(&mut self) {
        let (w, h) = (self.w, self.h);
        let orb_x = match self.style().image_alignment {
            ImageAlignment::Center => w * 0.5,
            ImageAlignment::Right => w * 0.64,
            ImageAlignment::Left => w * 0.36,
        };
        let center = Point::new(orb_x, h * 0.36);
        let accent = self.style().palette.accent.with_alpha(ORB_ALPHA);
        self.b.scoped(|b| {
            b.set_fill(Paint::Radial {
                center,
                r0: 80.0,
                r1: w * 0.5,
                stops: [accent, Rgba8::TRANSPARENT],
            });
            b.fill_path(ellipse(center, w * 0.32, h * 0.2));
        });
    }

    fn product_image(&mut self) {
        let (w, h) = (self.w, self.h);
        let align = self.style().image_alignment;
        let palette = &self.scene.style.palette;

        let Some(image) = self.scene.image.clone() else {
            let pw = w * 0.42;
            let ph = h * 0.48;
            let x = match align {
                ImageAlignment::Center => (w - pw) / 2.0,
                ImageAlignment::Right => w * 0.62 - pw / 2.0,
                ImageAlignment::Left => w * 0.34 - pw / 2.0,
            };
            let secondary = palette.secondary;
            self.b.scoped(|b| {
                b.set_alpha(0.3);
                b.set_dash(&[18.0, 14.0]);
                b.set_line_width(4.0);
                b.set_stroke(secondary);
                b.stroke_path(rounded_rect(Rect::new(x, h * 0.2, x + pw, h * 0.2 + ph), 28.0));
            });
            return;
        };

        let max_w = if self.style().layout == LayoutKind::Split {
            w * 0.55
        } else {
            w * 0.6
        };
        let max_h = h * 0.55;
        let scale = (max_w / f64::from(image.width)).min(max_h / f64::from(image.height));
        let dw = f64::from(image.width) * scale;
        let dh = f64::from(image.height) * scale;
        let x = match align {
            ImageAlignment::Center => (w - dw) / 2.0,
            ImageAlignment::Right => w * 0.62 - dw / 2.0,
            ImageAlignment::Left => w * 0.36 - dw / 2.0,
        };
        let y = h * 0.18;
        let shadow = DropShadow {
            color: palette.shadow,
            blur: SHADOW_BLUR,
            offset: Vec2::new(0.0, SHADOW_OFFSET_Y),
        };
        self.b.scoped(|b| {
            b.set_shadow(Some(shadow));
            b.draw_image(image, Rect::new(x, y, x + dw, y + dh));
        });
    }

    fn accent_pill(&mut self) {
        let form = &self.scene.form;
        let label = if form.accent.is_empty() {
            &self.scene.fallback_accent
        } else {
            &form.accent
        };
        let text = label.to_uppercase();
        let font = FontSpec::px(20.0);
        let width = (self.w * 0.6).min(self.measure.measure(&text, font) + 120.0);
        let x = if self.style().layout == LayoutKind::Center {
            self.w / 2.0 - width / 2.0
        } else {
            self.w * 0.1
        };
        let y = 90.0;
        let palette = self.scene.style.palette.clone();

        self.b.scoped(|b| {
            b.set_font(font);
            b.set_fill(palette.accent);
            b.set_alpha(FILL_ALPHA);
            b.fill_path(rounded_rect(Rect::new(x, y, x + width, y + 48.0), 28.0));
            b.set_fill(palette.accent_text);
            b.set_align(TextAlign::Left);
            b.set_alpha(1.0);
            b.fill_text(text, x + 32.0, y + 30.0);
        });
    }

    /// Brand, product name, tagline and description. Returns where bullets start.
    fn text_blocks(&mut self) -> f64 {
        let col = self.column();
        let form = &self.scene.form;
        let palette = &self.scene.style.palette;
        let b = &mut self.b;
        let measure = &mut *self.measure;

        b.save();
        b.set_align(col.align);

        let brand_y = self.h * 0.6;
        if !form.brand_name.trim().is_empty() {
            b.set_fill(palette.subtext);
            b.set_font(FontSpec::px(26.0));
            b.fill_text(form.brand_name.to_uppercase(), col.x, brand_y);
        }

        let mut block = |b: &mut PlanBuilder,
                         text: &str,
                         color: Rgba8,
                         size: f32,
                         y: f64,
                         line_height: f64| {
            let font = FontSpec::px(size);
            b.set_fill(color);
            b.set_font(font);
            let wrapped = wrap_lines(measure, text, font, y, col.width, line_height);
            fill_wrapped_text(b, &wrapped, col.x);
            wrapped.next_y
        };
        let next = block(b, &form.product_name, palette.text, 74.0, brand_y + 70.0, 80.0);
        let next = block(b, &form.tagline, palette.secondary, 42.0, next + 6.0, 56.0);
        let next = block(b, &form.description, DESCRIPTION_COLOR, 26.0, next + 4.0, 40.0);

        b.restore();
        next + 24.0
    }

    fn bullets(&mut self, start_y: f64) {
        let col = self.column();
        let center = self.style().layout == LayoutKind::Center;
        let palette = self.scene.style.palette.clone();

        for (index, point) in self.scene.bullets.as_slice().iter().enumerate() {
            if point.trim().is_empty() {
                continue;
            }
            if center {
                let text = point.to_uppercase();
                let font = FontSpec::px(22.0);
                let chip_w = col.width.min(self.measure.measure(&text, font) + 90.0);
                let chip_x = self.w / 2.0 - chip_w / 2.0;
                let chip_y = start_y + index as f64 * 66.0;
                let mid = self.w / 2.0;
                self.b.scoped(|b| {
                    b.set_font(font);
                    b.set_fill(palette.panel);
                    b.set_alpha(FILL_ALPHA);
                    b.fill_path(rounded_rect(
                        Rect::new(chip_x, chip_y, chip_x + chip_w, chip_y + 54.0),
                        32.0,
                    ));
                    b.set_alpha(1.0);
                    b.set_fill(palette.text);
                    b.set_align(TextAlign::Center);
                    b.fill_text(text, mid, chip_y + 35.0);
                });
            } else {
                let y = start_y + index as f64 * 42.0;
                self.b.scoped(|b| {
                    b.set_font(FontSpec::px(24.0));
                    b.set_fill(palette.subtext);
                    b.set_align(TextAlign::Left);
                    b.fill_text(format!("• {point}"), col.x, y);
                });
            }
        }
    }

    fn cta(&mut self) {
        let left = self.style().layout.is_left_aligned();
        let text = if self.scene.form.cta.is_empty() {
            DEFAULT_CTA.to_string()
        } else {
            self.scene.form.cta.clone()
        };
        let font = FontSpec::px(30.0);
        let natural = self.measure.measure(&text, font) + CTA_PADDING_X * 2.0;
        let width = if left {
            natural.max(CTA_MIN_WIDTH)
        } else {
            natural
        };
        let y = self.h - 160.0;
        let x = if left {
            self.w * 0.1
        } else {
            self.w / 2.0 - width / 2.0
        };
        let radius = self.style().cta_style.corner_radius();
        let palette = self.scene.style.palette.clone();
        let (text_x, align) = if left {
            (x + CTA_PADDING_X, TextAlign::Left)
        } else {
            (self.w / 2.0, TextAlign::Center)
        };

        self.b.scoped(|b| {
            b.set_font(font);
            b.set_fill(palette.accent);
            b.set_alpha(CTA_ALPHA);
            b.fill_path(rounded_rect(Rect::new(x, y, x + width, y + CTA_HEIGHT), radius));
            b.set_alpha(1.0);
            b.set_fill(palette.accent_text);
            b.set_align(align);
            b.fill_text(text, text_x, y + CTA_HEIGHT / 2.0 + 10.0);
        });
    }

    fn price_badge(&mut self) {
        let price = &self.scene.form.price;
        if price.trim().is_empty() {
            return;
        }
        let x = if self.style().image_alignment == ImageAlignment::Left {
            self.w - 170.0
        } else {
            self.w - 150.0
        };
        let y = self.h * 0.26;
        let palette = &self.scene.style.palette;

        self.b.scoped(|b| {
            b.set_fill(palette.panel);
            b.set_alpha(FILL_ALPHA);
            b.fill_path(circle(Point::new(x, y), 90.0));
            b.set_alpha(0.5);
            b.set_stroke(palette.accent);
            b.set_line_width(5.0);
            b.stroke_path(circle(Point::new(x, y), 90.0));
        });
        self.b.scoped(|b| {
            b.set_fill(palette.text);
            b.set_font(FontSpec::px(42.0));
            b.set_align(TextAlign::Center);
            b.fill_text(price.clone(), x, y + 14.0);
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
