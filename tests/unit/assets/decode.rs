use std::io::Cursor;

use super::*;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(vec![100, 50, 200, 128], 1, 1)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_svg_keeps_aspect_ratio() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="60">
        <rect width="30" height="60" fill="#ff0000"/></svg>"##;
    let img = decode_image(svg).unwrap();
    assert_eq!(img.height, 2 * img.width);
    assert!(img.height >= 1200);
    assert_eq!(img.alpha_at(img.width / 2, img.height / 2), 255);
}

#[test]
fn corrupt_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
    assert!(decode_image(br#"<svg"#).is_err());
}

#[test]
fn data_url_roundtrip() {
    let png = png_bytes(vec![1, 2, 3, 255], 1, 1);
    let url = encode_data_url("image/png", &png);
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(decode_data_url(&url).unwrap(), png);
}

#[test]
fn data_url_rejects_non_base64_forms() {
    assert!(decode_data_url("image/png;base64,AAAA").is_err());
    assert!(decode_data_url("data:text/plain,hello").is_err());
    assert!(decode_data_url("data:image/png;base64").is_err());
    assert!(decode_data_url("data:image/png;base64,@@@").is_err());
}

#[test]
fn from_premul_checks_buffer_length() {
    assert!(PosterImage::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(PosterImage::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(PosterImage::from_premul(0, 2, vec![]).is_err());
}

#[test]
fn svg_sniff_survives_multibyte_char_at_boundary() {
    let open = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><!-- "#;
    let mut svg = open.to_string();
    while svg.len() < 511 {
        svg.push('a');
    }
    // 'é' is two bytes, so it spans offsets 511 and 512.
    svg.push_str("é€ --><rect width=\"10\" height=\"10\" fill=\"red\"/></svg>");
    assert!(!svg.is_char_boundary(512));

    let img = decode_image(svg.as_bytes()).unwrap();
    assert_eq!(img.width, img.height);
    assert!(img.alpha_at(0, 0) > 0);
}

#[test]
fn oversized_images_are_rejected() {
    let side = MAX_IMAGE_DIM_PX + 1;
    let err = PosterImage::from_premul(side, 1, vec![255; side as usize * 4]).unwrap_err();
    assert!(matches!(err, PosterError::Asset(_)));
    assert!(decode_image(&png_bytes(vec![255; side as usize * 4], side, 1)).is_err());
    let max = MAX_IMAGE_DIM_PX;
    assert!(PosterImage::from_premul(max, 1, vec![0; max as usize * 4]).is_ok());
}
