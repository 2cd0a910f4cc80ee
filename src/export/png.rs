use std::io::Cursor;

use anyhow::Context;

use crate::assets::decode::encode_data_url;
use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::backend::FrameRGBA;

pub const FALLBACK_FILENAME: &str = "poster.png";

/// An encoded poster ready to be saved under `filename`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub png: Vec<u8>,
}

/// `<product name>.png`, or `poster.png` when the name is blank.
///
/// Path separators are replaced with `-` so the result is a single file name.
pub fn download_filename(product_name: &str) -> String {
    let name = product_name.trim();
    if name.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("{safe}.png")
}

/// Encode a frame as a straight-alpha PNG.
pub fn encode_png(frame: &FrameRGBA) -> PosterResult<Vec<u8>> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data).ok_or_else(|| {
        PosterError::render(format!(
            "frame buffer does not match {}x{}",
            frame.width, frame.height
        ))
    })?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

pub fn export_download(frame: &FrameRGBA, product_name: &str) -> PosterResult<Download> {
    Ok(Download {
        filename: download_filename(product_name),
        png: encode_png(frame)?,
    })
}

/// `data:image/png;base64,...` for a frame.
pub fn png_data_url(frame: &FrameRGBA) -> PosterResult<String> {
    Ok(encode_data_url("image/png", &encode_png(frame)?))
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
