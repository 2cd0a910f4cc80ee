use std::sync::Arc;

use crate::assets::decode::PosterImage;
use crate::foundation::core::{Affine, BezPath, CanvasSize, Point, Rect, Rgba8, Vec2};
use crate::text::engine::FontSpec;

/// How a fill is colored. Gradient coordinates are in logical canvas units.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba8),
    Linear {
        start: Point,
        end: Point,
        stops: [Rgba8; 2],
    },
    Radial {
        center: Point,
        r0: f64,
        r1: f64,
        stops: [Rgba8; 2],
    },
}

impl Paint {
    /// Straight-alpha color of this paint at logical point `p`.
    pub fn color_at(&self, p: Point) -> Rgba8 {
        match self {
            Self::Solid(c) => *c,
            Self::Linear { start, end, stops } => {
                let d = *end - *start;
                let len2 = d.hypot2();
                let t = if len2 <= f64::EPSILON {
                    0.0
                } else {
                    (p - *start).dot(d) / len2
                };
                lerp_color(stops[0], stops[1], t)
            }
            Self::Radial {
                center,
                r0,
                r1,
                stops,
            } => {
                let span = r1 - r0;
                let dist = (p - *center).hypot();
                let t = if span.abs() <= f64::EPSILON {
                    if dist < *r1 { 0.0 } else { 1.0 }
                } else {
                    (dist - r0) / span
                };
                lerp_color(stops[0], stops[1], t)
            }
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::Solid(Rgba8::opaque(0, 0, 0))
    }
}

impl From<Rgba8> for Paint {
    fn from(c: Rgba8) -> Self {
        Self::Solid(c)
    }
}

// Interpolates in premultiplied space so fades toward transparent keep their hue.
fn lerp_color(a: Rgba8, b: Rgba8, t: f64) -> Rgba8 {
    if t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    let px = crate::foundation::math::lerp_px(a.to_premul(), b.to_premul(), t as f32);
    let alpha = px[3];
    if alpha == 0 {
        return Rgba8::TRANSPARENT;
    }
    let mut straight = px;
    crate::foundation::math::unpremultiply_rgba8_in_place(&mut straight);
    Rgba8::new(straight[0], straight[1], straight[2], alpha)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Horizontal offset applied to a run of `width` anchored at its x.
    pub fn offset(self, width: f64) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => -width / 2.0,
            Self::Right => -width,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeSpec {
    pub width: f64,
    /// Alternating on/off lengths; empty means solid.
    pub dash: Vec<f64>,
}

/// Blurred, offset silhouette drawn beneath an image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropShadow {
    pub color: Rgba8,
    pub blur: f64,
    pub offset: Vec2,
}

/// One fully resolved drawing step.
#[derive(Clone, Debug)]
pub enum DrawOp {
    Clear {
        color: Rgba8,
    },
    FillPath {
        path: BezPath,
        paint: Paint,
        opacity: f32,
        transform: Affine,
    },
    StrokePath {
        path: BezPath,
        color: Rgba8,
        stroke: StrokeSpec,
        opacity: f32,
        transform: Affine,
    },
    Image {
        image: Arc<PosterImage>,
        dest: Rect,
        shadow: Option<DropShadow>,
        opacity: f32,
        transform: Affine,
    },
    /// `origin` is the alphabetic baseline anchor; `align` says which edge of the run sits on it.
    Text {
        text: String,
        origin: Point,
        align: TextAlign,
        font: FontSpec,
        color: Rgba8,
        opacity: f32,
        transform: Affine,
    },
}

/// Backend-agnostic draw list for one poster render.
#[derive(Clone, Debug)]
pub struct PosterPlan {
    pub canvas: CanvasSize,
    pub device_pixel_ratio: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub ops: Vec<DrawOp>,
}

impl PosterPlan {
    /// Text runs in draw order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Point, TextAlign)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text {
                text,
                origin,
                align,
                ..
            } => Some((text.as_str(), *origin, *align)),
            _ => None,
        })
    }

    pub fn find_text(&self, text: &str) -> Option<Point> {
        self.texts().find(|(t, _, _)| *t == text).map(|(_, p, _)| p)
    }
}

/// Drawing state captured by [`PlanBuilder::save`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    pub fill: Paint,
    pub stroke: Rgba8,
    pub alpha: f32,
    pub line_width: f64,
    pub dash: Vec<f64>,
    pub font: FontSpec,
    pub align: TextAlign,
    pub shadow: Option<DropShadow>,
    pub transform: Affine,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Paint::default(),
            stroke: Rgba8::opaque(0, 0, 0),
            alpha: 1.0,
            line_width: 1.0,
            dash: Vec::new(),
            font: FontSpec::default(),
            align: TextAlign::Left,
            shadow: None,
            transform: Affine::IDENTITY,
        }
    }
}

/// Records draw ops against a save/restore drawing-state stack.
///
/// Every emitted op is stamped with the state current at emission time, so
/// backends never need to track state themselves.
#[derive(Debug, Default)]
pub struct PlanBuilder {
    state: DrawState,
    stack: Vec<DrawState>,
    ops: Vec<DrawOp>,
}

impl PlanBuilder {
    pub fn new(transform: Affine) -> Self {
        Self {
            state: DrawState {
                transform,
                ..DrawState::default()
            },
            stack: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pop the last saved state. Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    /// Run `f` between a save and a matching restore.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let out = f(self);
        self.restore();
        out
    }

    pub fn set_fill(&mut self, paint: impl Into<Paint>) {
        self.state.fill = paint.into();
    }

    pub fn set_stroke(&mut self, color: Rgba8) {
        self.state.stroke = color;
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    pub fn set_dash(&mut self, dash: &[f64]) {
        self.state.dash = dash.to_vec();
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.state.font = font;
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.state.align = align;
    }

    pub fn set_shadow(&mut self, shadow: Option<DropShadow>) {
        self.state.shadow = shadow;
    }

    pub fn clear(&mut self, color: Rgba8) {
        self.ops.push(DrawOp::Clear { color });
    }

    pub fn fill_path(&mut self, path: BezPath) {
        self.ops.push(DrawOp::FillPath {
            path,
            paint: self.state.fill.clone(),
            opacity: self.state.alpha,
            transform: self.state.transform,
        });
    }

    pub fn fill_rect(&mut self, rect: Rect) {
        self.fill_path(kurbo::Shape::to_path(&rect, 0.1));
    }

    pub fn stroke_path(&mut self, path: BezPath) {
        self.ops.push(DrawOp::StrokePath {
            path,
            color: self.state.stroke,
            stroke: StrokeSpec {
                width: self.state.line_width,
                dash: self.state.dash.clone(),
            },
            opacity: self.state.alpha,
            transform: self.state.transform,
        });
    }

    pub fn draw_image(&mut self, image: Arc<PosterImage>, dest: Rect) {
        self.ops.push(DrawOp::Image {
            image,
            dest,
            shadow: self.state.shadow,
            opacity: self.state.alpha,
            transform: self.state.transform,
        });
    }

    /// Queue `text` at baseline `(x, y)` in the current fill color.
    ///
    /// Text only takes solid fills; a gradient fill uses its first stop.
    pub fn fill_text(&mut self, text: impl Into<String>, x: f64, y: f64) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        let color = match &self.state.fill {
            Paint::Solid(c) => *c,
            Paint::Linear { stops, .. } | Paint::Radial { stops, .. } => stops[0],
        };
        self.ops.push(DrawOp::Text {
            text,
            origin: Point::new(x, y),
            align: self.state.align,
            font: self.state.font,
            color,
            opacity: self.state.alpha,
            transform: self.state.transform,
        });
    }

    pub fn finish(
        self,
        canvas: CanvasSize,
        device_pixel_ratio: f64,
        pixel_width: u32,
        pixel_height: u32,
    ) -> PosterPlan {
        PosterPlan {
            canvas,
            device_pixel_ratio,
            pixel_width,
            pixel_height,
            ops: self.ops,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
