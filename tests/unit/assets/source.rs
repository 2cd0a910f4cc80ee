use super::*;
use crate::foundation::error::PosterError;

fn solid(w: u32, h: u32) -> PosterImage {
    PosterImage::from_premul(w, h, vec![255; (w * h * 4) as usize]).unwrap()
}

#[test]
fn sample_source_decodes() {
    let img = load_image_source(&ImageSource::Sample).unwrap();
    assert_eq!(img.width * 3, img.height * 2);
}

#[test]
fn latest_ticket_wins_over_slow_earlier_load() {
    let mut slot = ImageSlot::new();
    let slow = slot.begin();
    let fast = slot.begin();

    assert!(slot.finish(fast, Ok(solid(2, 2))));
    assert!(!slot.finish(slow, Ok(solid(9, 9))));
    assert_eq!(slot.current().unwrap().width, 2);
}

#[test]
fn failed_decode_keeps_previous_image() {
    let mut slot = ImageSlot::new();
    let t = slot.begin();
    assert!(slot.finish(t, Ok(solid(3, 1))));

    let t = slot.begin();
    assert!(!slot.finish(t, Err(PosterError::asset("corrupt"))));
    assert_eq!(slot.current().unwrap().width, 3);
}

#[test]
fn clear_invalidates_pending_loads() {
    let mut slot = ImageSlot::new();
    let t = slot.begin();
    assert!(slot.finish(t, Ok(solid(1, 1))));

    let pending = slot.begin();
    assert!(slot.clear());
    assert!(!slot.finish(pending, Ok(solid(4, 4))));
    assert!(slot.current().is_none());
    assert!(!slot.clear());
}

#[test]
fn data_url_and_path_sources_decode() {
    let url = crate::assets::decode::encode_data_url("image/svg+xml", SAMPLE_PRODUCT_SVG);
    assert!(load_image_source(&ImageSource::DataUrl(url)).is_ok());

    let missing = ImageSource::Path(PathBuf::from("does/not/exist.png"));
    assert!(load_image_source(&missing).is_err());
    assert_eq!(format!("{:?}", ImageSource::Sample), "sample");
}
