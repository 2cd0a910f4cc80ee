use super::*;
use crate::foundation::core::Affine;
use crate::render::plan::{DrawOp, PosterPlan};
use crate::style::catalog::StyleCatalog;

fn plan_for(kind: PatternKind) -> PosterPlan {
    let mut style = StyleCatalog::builtin().first().clone();
    style.pattern = kind;
    let mut b = PlanBuilder::new(Affine::IDENTITY);
    draw_pattern(&mut b, &style, CanvasSize::POSTER);
    assert_eq!(b.depth(), 0);
    assert_eq!(b.state().alpha, 1.0);
    b.finish(CanvasSize::POSTER, 1.0, 1080, 1350)
}

fn stroke_widths(plan: &PosterPlan) -> Vec<f64> {
    plan.ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::StrokePath { stroke, .. } => Some(stroke.width),
            _ => None,
        })
        .collect()
}

#[test]
fn none_draws_nothing() {
    assert!(plan_for(PatternKind::None).ops.is_empty());
}

#[test]
fn grid_has_nine_columns_and_eleven_rows() {
    let plan = plan_for(PatternKind::Grid);
    assert_eq!(plan.ops.len(), 20);
    assert!(stroke_widths(&plan).iter().all(|w| *w == 2.0));

    let DrawOp::StrokePath { path, .. } = &plan.ops[0] else {
        panic!("expected stroke");
    };
    let bb = kurbo::Shape::bounding_box(path);
    assert_eq!((bb.x0, bb.y0, bb.y1), (60.0, 0.0, 1350.0));
}

#[test]
fn dots_are_filled_circles() {
    let plan = plan_for(PatternKind::Dots);
    assert_eq!(plan.ops.len(), 9 * 11);
    for op in &plan.ops {
        let DrawOp::FillPath { opacity, .. } = op else {
            panic!("expected fill, got {op:?}");
        };
        assert_eq!(*opacity, PATTERN_ALPHA);
    }
}

#[test]
fn diagonal_lines_are_three_px() {
    let plan = plan_for(PatternKind::Diagonal);
    assert_eq!(plan.ops.len(), 18);
    assert!(stroke_widths(&plan).iter().all(|w| *w == 3.0));
}

#[test]
fn waves_sample_full_width() {
    let plan = plan_for(PatternKind::Waves);
    assert_eq!(plan.ops.len(), 10);
    let DrawOp::StrokePath { path, .. } = &plan.ops[0] else {
        panic!("expected stroke");
    };
    assert_eq!(path.elements().len(), 109);
    let bb = kurbo::Shape::bounding_box(path);
    assert_eq!(bb.x1, 1080.0);
    assert!((bb.y0 - (80.0 - 22.0)).abs() < 0.5);
    assert!((bb.y1 - (80.0 + 22.0)).abs() < 0.5);
}

#[test]
fn pattern_uses_secondary_color() {
    let style = StyleCatalog::builtin().get_style("organic").clone();
    let mut b = PlanBuilder::new(Affine::IDENTITY);
    draw_pattern(&mut b, &style, CanvasSize::POSTER);
    let plan = b.finish(CanvasSize::POSTER, 1.0, 1080, 1350);
    for op in &plan.ops {
        if let DrawOp::StrokePath { color, .. } = op {
            assert_eq!(*color, style.palette.secondary);
        }
    }
}
