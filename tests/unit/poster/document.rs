use super::*;
use crate::foundation::error::PosterError;

#[test]
fn empty_document_uses_defaults() {
    let doc = PosterDocument::from_json_str("{}", Path::new("/work")).unwrap();
    assert_eq!(doc.form, PosterForm::default());
    assert_eq!(doc.bullets.len(), 3);
    assert_eq!(doc.device_pixel_ratio, 1.0);
    assert_eq!(doc.image_source(), Some(ImageSource::Sample));
    assert_eq!(doc.base_dir(), Path::new("/work"));
}

#[test]
fn partial_form_fills_missing_fields() {
    let doc = PosterDocument::from_json_str(
        r#"{"form": {"product_name": "Kettle"}, "bullets": ["a"]}"#,
        Path::new("."),
    )
    .unwrap();
    assert_eq!(doc.form.product_name, "Kettle");
    assert_eq!(doc.form.brand_name, PosterForm::default().brand_name);
    assert_eq!(doc.bullets.as_slice(), ["a".to_string(), String::new()]);
}

#[test]
fn image_field_variants() {
    let parse = |image: &str| {
        let json = serde_json::json!({ "image": image }).to_string();
        PosterDocument::from_json_str(&json, Path::new("/docs"))
            .unwrap()
            .image_source()
    };
    assert_eq!(parse("none"), None);
    assert_eq!(parse(""), None);
    assert_eq!(
        parse("art/can.png"),
        Some(ImageSource::Path(PathBuf::from("/docs/art/can.png")))
    );
    assert_eq!(
        parse("/abs/can.png"),
        Some(ImageSource::Path(PathBuf::from("/abs/can.png")))
    );
    assert!(matches!(
        parse("data:image/png;base64,AAAA"),
        Some(ImageSource::DataUrl(_))
    ));
}

#[test]
fn invalid_device_pixel_ratio_is_rejected() {
    let err = PosterDocument::from_json_str(r#"{"device_pixel_ratio": 0}"#, Path::new("."))
        .unwrap_err();
    assert!(matches!(err, PosterError::Validation(_)));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = PosterDocument::from_json_str("{", Path::new(".")).unwrap_err();
    assert!(matches!(err, PosterError::Serde(_)));
}

#[test]
fn open_studio_applies_style_form_and_image() {
    let doc = PosterDocument::from_json_str(
        r#"{"style": "organic", "form": {"price": ""}, "image": "none", "seed": 9}"#,
        Path::new("."),
    )
    .unwrap();
    let studio = doc.open_studio(None).unwrap();
    assert_eq!(studio.style().id, "organic");
    assert_eq!(studio.form().price, "");
    assert!(studio.image().is_none());

    let again = doc.open_studio(None).unwrap();
    assert_eq!(studio.fallback_accent(), again.fallback_accent());
}

#[test]
fn open_studio_loads_bundled_sample_by_default() {
    let doc = PosterDocument::default();
    let studio = doc.open_studio(Some(1)).unwrap();
    assert!(studio.image().is_some());
}

#[test]
fn missing_image_file_falls_back_to_placeholder() {
    let doc = PosterDocument::from_json_str(
        r#"{"image": "definitely-missing.png"}"#,
        Path::new("/nonexistent-dir"),
    )
    .unwrap();
    let studio = doc.open_studio(Some(1)).unwrap();
    assert!(studio.image().is_none());
}

#[test]
fn missing_catalog_file_is_an_error() {
    let doc = PosterDocument::from_json_str(
        r#"{"catalog": "nope.json"}"#,
        Path::new("/nonexistent-dir"),
    )
    .unwrap();
    assert!(doc.open_studio(Some(1)).is_err());
}

#[test]
fn serializes_back_to_json() {
    let doc = PosterDocument::default();
    let json = doc.to_json_string().unwrap();
    let back = PosterDocument::from_json_str(&json, Path::new(".")).unwrap();
    assert_eq!(back, doc);
}
