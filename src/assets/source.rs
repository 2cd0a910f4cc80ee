use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::{PosterImage, decode_data_url, decode_image};
use crate::foundation::error::PosterResult;

/// Bundled sample product artwork shown until the user uploads an image.
pub const SAMPLE_PRODUCT_SVG: &[u8] = include_bytes!("../../assets/sample-product.svg");

/// Where a product image comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// The bundled sample artwork.
    Sample,
    /// Raw encoded bytes, e.g. an uploaded file.
    Bytes(Arc<Vec<u8>>),
    /// A `data:` URL with a base64 payload.
    DataUrl(String),
    /// A file on disk.
    Path(PathBuf),
}

impl ImageSource {
    /// Short human-readable description used in logs.
    pub fn label(&self) -> String {
        match self {
            Self::Sample => "sample".to_string(),
            Self::Bytes(b) => format!("upload ({} bytes)", b.len()),
            Self::DataUrl(url) => format!("data url ({} chars)", url.len()),
            Self::Path(p) => p.display().to_string(),
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Read and decode any [`ImageSource`].
pub fn load_image_source(source: &ImageSource) -> PosterResult<PosterImage> {
    match source {
        ImageSource::Sample => decode_image(SAMPLE_PRODUCT_SVG),
        ImageSource::Bytes(bytes) => decode_image(bytes),
        ImageSource::DataUrl(url) => decode_image(&decode_data_url(url)?),
        ImageSource::Path(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read image '{}'", path.display()))?;
            decode_image(&bytes)
        }
    }
}

/// Proof that an image load was started; only the latest ticket may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct ImageTicket {
    generation: u64,
}

/// The single active product image, guarded against out-of-order completions.
#[derive(Clone, Debug, Default)]
pub struct ImageSlot {
    current: Option<Arc<PosterImage>>,
    issued: u64,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Arc<PosterImage>> {
        self.current.as_ref()
    }

    /// Start a load; any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> ImageTicket {
        self.issued += 1;
        ImageTicket {
            generation: self.issued,
        }
    }

    pub fn is_current(&self, ticket: ImageTicket) -> bool {
        ticket.generation == self.issued
    }

    /// Complete a load. Returns whether the active image changed.
    ///
    /// Stale tickets are ignored. A failed decode keeps the previous image.
    pub fn finish(&mut self, ticket: ImageTicket, result: PosterResult<PosterImage>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.issued,
                "dropping stale image load"
            );
            return false;
        }
        match result {
            Ok(image) => {
                self.current = Some(Arc::new(image));
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "image decode failed; keeping previous image");
                false
            }
        }
    }

    /// Drop the active image so the placeholder is drawn. Invalidates pending loads.
    pub fn clear(&mut self) -> bool {
        self.issued += 1;
        self.current.take().is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
