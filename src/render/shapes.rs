use kurbo::Shape;

use crate::foundation::core::{BezPath, Point, Rect};

const TOLERANCE: f64 = 0.1;

/// Rounded rectangle with quadratic corners.
///
/// The radius is clamped to half the shorter side.
pub fn rounded_rect(rect: Rect, radius: f64) -> BezPath {
    let r = radius
        .max(0.0)
        .min(rect.width().abs() / 2.0)
        .min(rect.height().abs() / 2.0);
    let (x0, y0, x1, y1) = (rect.x0, rect.y0, rect.x1, rect.y1);

    let mut p = BezPath::new();
    p.move_to((x0 + r, y0));
    p.line_to((x1 - r, y0));
    p.quad_to((x1, y0), (x1, y0 + r));
    p.line_to((x1, y1 - r));
    p.quad_to((x1, y1), (x1 - r, y1));
    p.line_to((x0 + r, y1));
    p.quad_to((x0, y1), (x0, y1 - r));
    p.line_to((x0, y0 + r));
    p.quad_to((x0, y0), (x0 + r, y0));
    p.close_path();
    p
}

pub fn circle(center: Point, radius: f64) -> BezPath {
    kurbo::Circle::new(center, radius).to_path(TOLERANCE)
}

pub fn ellipse(center: Point, rx: f64, ry: f64) -> BezPath {
    kurbo::Ellipse::new(center, (rx, ry), 0.0).to_path(TOLERANCE)
}

pub fn line(a: Point, b: Point) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(a);
    p.line_to(b);
    p
}

/// Open path through `points`; empty input yields an empty path.
pub fn polyline(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut p = BezPath::new();
    for (i, pt) in points.into_iter().enumerate() {
        if i == 0 {
            p.move_to(pt);
        } else {
            p.line_to(pt);
        }
    }
    p
}

#[cfg(test)]
#[path = "../../tests/unit/render/shapes.rs"]
mod tests;
