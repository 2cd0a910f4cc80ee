use super::*;
use crate::foundation::core::CanvasSize;
use crate::render::plan::PlanBuilder;

const SMALL: CanvasSize = CanvasSize {
    width: 20,
    height: 10,
};

fn render(b: PlanBuilder, dpr: f64) -> FrameRGBA {
    let (w, h) = (
        (f64::from(SMALL.width) * dpr) as u32,
        (f64::from(SMALL.height) * dpr) as u32,
    );
    let plan = b.finish(SMALL, dpr, w, h);
    CpuBackend::default().render_plan(&plan).unwrap()
}

fn full_rect() -> Rect {
    Rect::new(0.0, 0.0, 20.0, 10.0)
}

#[test]
fn empty_plan_is_transparent() {
    let frame = render(PlanBuilder::default(), 1.0);
    assert_eq!(frame.data.len(), 20 * 10 * 4);
    assert!(frame.premultiplied);
    assert!(!frame.has_coverage());
}

#[test]
fn solid_fill_covers_surface() {
    let mut b = PlanBuilder::default();
    b.set_fill(Rgba8::opaque(255, 0, 0));
    b.fill_rect(full_rect());
    let frame = render(b, 1.0);
    assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(19, 9), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(20, 0), None);
}

#[test]
fn alpha_scales_solid_fill() {
    let mut b = PlanBuilder::default();
    b.set_fill(Rgba8::opaque(255, 255, 255));
    b.set_alpha(0.5);
    b.fill_rect(full_rect());
    let a = render(b, 1.0).pixel(5, 5).unwrap()[3];
    assert!((i16::from(a) - 128).abs() <= 1);
}

#[test]
fn linear_gradient_is_baked_across_the_fill() {
    let mut b = PlanBuilder::default();
    b.set_fill(Paint::Linear {
        start: Point::new(0.0, 0.0),
        end: Point::new(20.0, 0.0),
        stops: [Rgba8::opaque(0, 0, 0), Rgba8::opaque(0, 0, 255)],
    });
    b.fill_rect(full_rect());
    let frame = render(b, 2.0);
    assert_eq!((frame.width, frame.height), (40, 20));
    let left = frame.pixel(0, 10).unwrap();
    let right = frame.pixel(39, 10).unwrap();
    assert!(left[2] < 10);
    assert!(right[2] > 245);
    assert_eq!(right[3], 255);
}

#[test]
fn image_is_scaled_into_dest() {
    let img = Arc::new(
        PosterImage::from_premul(2, 2, [0u8, 255, 0, 255].repeat(4)).unwrap(),
    );
    let mut b = PlanBuilder::default();
    b.draw_image(img, Rect::new(0.0, 0.0, 10.0, 10.0));
    let frame = render(b, 1.0);
    assert_eq!(frame.pixel(5, 5), Some([0, 255, 0, 255]));
    assert_eq!(frame.pixel(15, 5).unwrap()[3], 0);
}

#[test]
fn shadow_lands_below_image() {
    let img = Arc::new(PosterImage::from_premul(4, 4, [255u8; 4].repeat(16)).unwrap());
    let mut b = PlanBuilder::default();
    b.set_shadow(Some(DropShadow {
        color: Rgba8::opaque(0, 0, 0),
        blur: 0.0,
        offset: crate::foundation::core::Vec2::new(0.0, 4.0),
    }));
    b.draw_image(img, Rect::new(4.0, 0.0, 8.0, 4.0));
    let frame = render(b, 1.0);
    assert_eq!(frame.pixel(6, 2), Some([255, 255, 255, 255]));
    let below = frame.pixel(6, 6).unwrap();
    assert_eq!(below[3], 255);
    assert!(below[0] < 10);
    assert_eq!(frame.pixel(15, 6).unwrap()[3], 0);
}

#[test]
fn dashed_stroke_leaves_gaps() {
    let mut b = PlanBuilder::default();
    b.set_stroke(Rgba8::opaque(255, 255, 255));
    b.set_line_width(4.0);
    b.set_dash(&[4.0, 4.0]);
    b.stroke_path(crate::render::shapes::line(
        Point::new(0.0, 5.0),
        Point::new(20.0, 5.0),
    ));
    let frame = render(b, 1.0);
    assert_eq!(frame.pixel(2, 5).unwrap()[3], 255);
    assert_eq!(frame.pixel(6, 5).unwrap()[3], 0);
}

#[test]
fn text_without_font_is_skipped_and_measured_approximately() {
    let mut backend = CpuBackend::default();
    assert!(!backend.has_font());
    let w = backend.text_measure().measure("abc", FontSpec::px(10.0));
    assert!((w - 3.0 * 10.0 * 0.56).abs() < 1e-9);

    let mut b = PlanBuilder::default();
    b.set_fill(Rgba8::opaque(255, 255, 255));
    b.fill_text("Hello", 2.0, 8.0);
    let plan = b.finish(SMALL, 1.0, 20, 10);
    assert!(!backend.render_plan(&plan).unwrap().has_coverage());
}

#[test]
fn context_is_reused_between_renders() {
    let mut backend = CpuBackend::default();
    let mut b = PlanBuilder::default();
    b.set_fill(Rgba8::opaque(9, 9, 9));
    b.fill_rect(full_rect());
    let plan = b.finish(SMALL, 1.0, 20, 10);

    let first = backend.render_plan(&plan).unwrap();
    let second = backend.render_plan(&plan).unwrap();
    assert_eq!(first, second);

    let empty = PlanBuilder::default().finish(SMALL, 1.0, 20, 10);
    assert!(!backend.render_plan(&empty).unwrap().has_coverage());
}

#[test]
fn oversized_frames_are_rejected() {
    let plan = PlanBuilder::default().finish(SMALL, 1.0, 70_000, 10);
    assert!(CpuBackend::default().render_plan(&plan).is_err());
}
