use std::f64::consts::TAU;

use crate::foundation::core::{CanvasSize, Point};
use crate::render::plan::PlanBuilder;
use crate::render::shapes::{circle, line, polyline};
use crate::style::catalog::{PatternKind, StylePreset};

pub const PATTERN_ALPHA: f32 = 0.12;

const GRID_SPACING: f64 = 120.0;
const DOT_STEP: f64 = 120.0;
const DOT_RADIUS: f64 = 6.0;
const DIAGONAL_SPACING: f64 = 140.0;
const WAVE_SPACING: f64 = 140.0;
const WAVE_AMPLITUDE: f64 = 22.0;
const WAVE_LENGTH: f64 = 180.0;
const WAVE_STEP: f64 = 10.0;

/// Overlay the style's background texture. All drawing state is restored afterwards.
pub fn draw_pattern(b: &mut PlanBuilder, style: &StylePreset, canvas: CanvasSize) {
    let (w, h) = (canvas.width_f64(), canvas.height_f64());
    b.scoped(|b| {
        b.set_alpha(PATTERN_ALPHA);
        b.set_line_width(2.0);
        b.set_stroke(style.palette.secondary);
        b.set_fill(style.palette.secondary);

        match style.pattern {
            PatternKind::None => {}
            PatternKind::Grid => {
                for x in steps(GRID_SPACING / 2.0, GRID_SPACING, w) {
                    b.stroke_path(line(Point::new(x, 0.0), Point::new(x, h)));
                }
                for y in steps(GRID_SPACING / 2.0, GRID_SPACING, h) {
                    b.stroke_path(line(Point::new(0.0, y), Point::new(w, y)));
                }
            }
            PatternKind::Dots => {
                for x in steps(40.0, DOT_STEP, w) {
                    for y in steps(60.0, DOT_STEP, h) {
                        b.fill_path(circle(Point::new(x, y), DOT_RADIUS));
                    }
                }
            }
            PatternKind::Diagonal => {
                b.set_line_width(3.0);
                for i in steps(-h, DIAGONAL_SPACING, w) {
                    b.stroke_path(line(Point::new(i, 0.0), Point::new(i + h, h)));
                }
            }
            PatternKind::Waves => {
                for y in steps(80.0, WAVE_SPACING, h) {
                    let samples = (w / WAVE_STEP).floor() as usize;
                    let points = (0..=samples).map(|k| {
                        let x = k as f64 * WAVE_STEP;
                        Point::new(x, y + (x / WAVE_LENGTH * TAU).sin() * WAVE_AMPLITUDE)
                    });
                    b.stroke_path(polyline(points));
                }
            }
        }
    });
}

// start, start + step, ... while < end
fn steps(start: f64, step: f64, end: f64) -> impl Iterator<Item = f64> {
    (0u32..)
        .map(move |k| start + f64::from(k) * step)
        .take_while(move |v| *v < end)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pattern.rs"]
mod tests;
