use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Largest side the raster backend can sample from.
pub const MAX_IMAGE_DIM_PX: u32 = u16::MAX as u32;

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PosterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PosterImage {
    /// Wrap already premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> PosterResult<Self> {
        if width == 0 || height == 0 {
            return Err(PosterError::asset("image dimensions must be non-zero"));
        }
        if width > MAX_IMAGE_DIM_PX || height > MAX_IMAGE_DIM_PX {
            return Err(PosterError::asset(format!(
                "image {width}x{height} exceeds {MAX_IMAGE_DIM_PX} px per side"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| PosterError::asset("image buffer size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(PosterError::asset(format!(
                "image byte len {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Alpha of the pixel at `(x, y)`; out-of-bounds reads are transparent.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4 + 3;
        self.rgba8_premul[idx]
    }
}

/// SVGs smaller than this on their long side are rasterized at a higher scale.
const SVG_MIN_LONG_SIDE_PX: f32 = 1200.0;
const SVG_MAX_DIM_PX: u32 = 8192;

/// Decode encoded image bytes (PNG, JPEG, WebP, ... or SVG) into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> PosterResult<PosterImage> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        return rasterize_svg(&tree);
    }

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    PosterImage::from_premul(width, height, rgba8_premul)
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> PosterResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize an SVG tree, preserving its aspect ratio.
pub fn rasterize_svg(tree: &usvg::Tree) -> PosterResult<PosterImage> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(PosterError::asset("svg has invalid width/height"));
    }
    let scale = (SVG_MIN_LONG_SIDE_PX / w.max(h)).max(1.0);
    let width = ((w * scale).ceil() as u32).max(1);
    let height = ((h * scale).ceil() as u32).max(1);
    if width > SVG_MAX_DIM_PX || height > SVG_MAX_DIM_PX {
        return Err(PosterError::asset(format!(
            "svg raster size too large: {width}x{height}"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| PosterError::asset("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        (width as f32) / w,
        (height as f32) / h,
    );
    resvg::render(tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixmaps are already premultiplied RGBA8.
    PosterImage::from_premul(width, height, pixmap.data().to_vec())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    // A multi-byte character may be cut at the sniff boundary.
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(err) if err.error_len().is_none() => {
            std::str::from_utf8(&head[..err.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return false,
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> PosterResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| PosterError::asset("data url must start with 'data:'"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| PosterError::asset("data url is missing ',' separator"))?;
    if !header.ends_with(";base64") {
        return Err(PosterError::asset("only base64 data urls are supported"));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode base64 data url payload")?;
    Ok(bytes)
}

/// Encode bytes as a base64 data URL with the given mime type.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
