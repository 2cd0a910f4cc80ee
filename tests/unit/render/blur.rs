use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((2 * w + 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 2, 1.2).unwrap();

    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 4);
}

#[test]
fn blur_rejects_bad_input() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1, 1.0).is_err());
    assert!(blur_rgba8_premul(&[0u8; 8], 1, 2, 1, 0.0).is_err());
}

fn opaque_block(w: u32, h: u32) -> PosterImage {
    PosterImage::from_premul(w, h, [255u8; 4].repeat((w * h) as usize)).unwrap()
}

#[test]
fn shadow_mask_is_padded_and_soft() {
    let img = opaque_block(40, 80);
    let color = Rgba8::new(2, 132, 199, 97);
    let mask = shadow_mask(&img, 400.0, 800.0, color, 80.0).unwrap();

    // sigma = 80 / 2 / 4 = 10 mask px, radius 30.
    assert_eq!(mask.pad, 30);
    assert_eq!(mask.width, 100 + 60);
    assert_eq!(mask.height, 200 + 60);

    let alpha = |x: u32, y: u32| mask.rgba8_premul[((y * mask.width + x) * 4 + 3) as usize];
    assert_eq!(alpha(0, 0), 0);
    let center = alpha(mask.width / 2, mask.height / 2);
    assert!((i16::from(center) - 97).abs() <= 1);
    let edge = alpha(mask.pad, mask.height / 2);
    assert!(edge > 0 && edge < center);
}

#[test]
fn shadow_mask_follows_image_alpha() {
    // Left half opaque, right half transparent.
    let mut px = Vec::new();
    for _y in 0..4 {
        px.extend_from_slice(&[255, 255, 255, 255, 255, 255, 255, 255]);
        px.extend_from_slice(&[0; 8]);
    }
    let img = PosterImage::from_premul(4, 4, px).unwrap();
    let mask = shadow_mask(&img, 64.0, 64.0, Rgba8::opaque(0, 0, 0), 0.0).unwrap();
    assert_eq!(mask.pad, 0);
    assert_eq!((mask.width, mask.height), (16, 16));
    let alpha = |x: u32, y: u32| mask.rgba8_premul[((y * mask.width + x) * 4 + 3) as usize];
    assert_eq!(alpha(2, 8), 255);
    assert_eq!(alpha(13, 8), 0);
}

#[test]
fn shadow_mask_rejects_empty_destination() {
    let img = opaque_block(2, 2);
    assert!(shadow_mask(&img, 0.0, 10.0, Rgba8::opaque(0, 0, 0), 80.0).is_err());
}
