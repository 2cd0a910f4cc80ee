use super::*;

fn red() -> Rgba8 {
    Rgba8::opaque(255, 0, 0)
}

#[test]
fn scoped_state_does_not_leak() {
    let mut b = PlanBuilder::new(Affine::scale(2.0));
    b.set_fill(red());
    b.scoped(|b| {
        b.set_alpha(0.12);
        b.set_line_width(3.0);
        b.set_dash(&[18.0, 14.0]);
        b.set_fill(Rgba8::opaque(0, 0, 255));
        assert_eq!(b.depth(), 1);
    });
    assert_eq!(b.depth(), 0);
    assert_eq!(b.state().alpha, 1.0);
    assert_eq!(b.state().line_width, 1.0);
    assert!(b.state().dash.is_empty());
    assert_eq!(b.state().fill, Paint::Solid(red()));
    assert_eq!(b.state().transform, Affine::scale(2.0));
}

#[test]
fn unbalanced_restore_is_ignored() {
    let mut b = PlanBuilder::default();
    b.set_alpha(0.5);
    b.restore();
    assert_eq!(b.state().alpha, 0.5);
}

#[test]
fn ops_are_stamped_with_state_at_emission() {
    let mut b = PlanBuilder::new(Affine::scale(2.0));
    b.set_stroke(red());
    b.set_alpha(0.3);
    b.set_line_width(4.0);
    b.set_dash(&[18.0, 14.0]);
    b.stroke_path(kurbo::Shape::to_path(&Rect::new(0.0, 0.0, 10.0, 10.0), 0.1));
    b.set_alpha(1.0);

    let plan = b.finish(CanvasSize::POSTER, 2.0, 2160, 2700);
    match &plan.ops[0] {
        DrawOp::StrokePath {
            color,
            stroke,
            opacity,
            transform,
            ..
        } => {
            assert_eq!(*color, red());
            assert_eq!(stroke.width, 4.0);
            assert_eq!(stroke.dash, vec![18.0, 14.0]);
            assert_eq!(*opacity, 0.3);
            assert_eq!(*transform, Affine::scale(2.0));
        }
        other => panic!("unexpected op {other:?}"),
    }
}

#[test]
fn text_records_anchor_alignment_and_font() {
    let mut b = PlanBuilder::default();
    b.set_fill(red());
    b.set_font(FontSpec::px(42.0));
    b.set_align(TextAlign::Center);
    b.fill_text("$24", 930.0, 365.0);
    b.fill_text("", 0.0, 0.0);

    let plan = b.finish(CanvasSize::POSTER, 1.0, 1080, 1350);
    assert_eq!(plan.ops.len(), 1);
    let texts: Vec<_> = plan.texts().collect();
    assert_eq!(texts, vec![("$24", Point::new(930.0, 365.0), TextAlign::Center)]);
    assert_eq!(plan.find_text("$24"), Some(Point::new(930.0, 365.0)));
    assert_eq!(plan.find_text("nope"), None);
}

#[test]
fn invalid_state_values_are_ignored() {
    let mut b = PlanBuilder::default();
    b.set_alpha(f32::NAN);
    b.set_line_width(-1.0);
    b.set_alpha(7.0);
    assert_eq!(b.state().alpha, 1.0);
    assert_eq!(b.state().line_width, 1.0);
}

#[test]
fn linear_paint_interpolates_along_axis() {
    let p = Paint::Linear {
        start: Point::new(0.0, 0.0),
        end: Point::new(100.0, 0.0),
        stops: [Rgba8::opaque(0, 0, 0), Rgba8::opaque(200, 100, 0)],
    };
    assert_eq!(p.color_at(Point::new(-10.0, 5.0)), Rgba8::opaque(0, 0, 0));
    assert_eq!(p.color_at(Point::new(50.0, 99.0)), Rgba8::opaque(100, 50, 0));
    assert_eq!(p.color_at(Point::new(500.0, 0.0)), Rgba8::opaque(200, 100, 0));
}

#[test]
fn radial_paint_fades_to_transparent_keeping_hue() {
    let accent = Rgba8::new(56, 189, 248, 0x33);
    let p = Paint::Radial {
        center: Point::new(0.0, 0.0),
        r0: 80.0,
        r1: 540.0,
        stops: [accent, Rgba8::TRANSPARENT],
    };
    assert_eq!(p.color_at(Point::new(10.0, 0.0)), accent);
    assert_eq!(p.color_at(Point::new(600.0, 0.0)), Rgba8::TRANSPARENT);

    let mid = p.color_at(Point::new(310.0, 0.0));
    assert!(mid.a > 0 && mid.a < accent.a);
    assert!(mid.b > mid.r);
}

#[test]
fn text_align_offsets() {
    assert_eq!(TextAlign::Left.offset(100.0), 0.0);
    assert_eq!(TextAlign::Center.offset(100.0), -50.0);
    assert_eq!(TextAlign::Right.offset(100.0), -100.0);
}
