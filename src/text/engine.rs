use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};

/// Average glyph advance, in ems, used when no real font is available.
pub const APPROX_ADVANCE_EM: f64 = 0.56;

/// Font parameters for a single text run.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FontSpec {
    pub size_px: f32,
}

impl FontSpec {
    pub const fn px(size_px: f32) -> Self {
        Self { size_px }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::px(16.0)
    }
}

/// Measures the advance width of a single line of text in logical pixels.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64;
}

/// Fixed-advance measurer used when no font could be resolved.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMetrics;

impl TextMeasure for ApproxMetrics {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        text.chars().count() as f64 * f64::from(font.size_px) * APPROX_ADVANCE_EM
    }
}

/// Raw font file contents plus the face index inside it.
#[derive(Clone, Debug)]
pub struct FontBytes {
    pub data: Arc<Vec<u8>>,
    pub index: u32,
}

/// Read an explicit font file, or fall back to the system sans-serif face.
///
/// Returns `Ok(None)` when no path is given and the system has no usable font.
pub fn resolve_font_bytes(path: Option<&Path>) -> PosterResult<Option<FontBytes>> {
    if let Some(path) = path {
        let data =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        if data.is_empty() {
            return Err(PosterError::asset(format!(
                "font file '{}' is empty",
                path.display()
            )));
        }
        return Ok(Some(FontBytes {
            data: Arc::new(data),
            index: 0,
        }));
    }

    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let query = usvg::fontdb::Query {
        families: &[usvg::fontdb::Family::SansSerif],
        ..Default::default()
    };
    let Some(id) = db.query(&query) else {
        tracing::warn!("no system sans-serif font found");
        return Ok(None);
    };
    let face = db.with_face_data(id, |data, index| FontBytes {
        data: Arc::new(data.to_vec()),
        index,
    });
    if face.is_none() {
        tracing::warn!("system font face data unavailable");
    }
    Ok(face)
}

/// Parley-backed shaping and measurement for a single registered font family.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family_name: String,
    font: FontBytes,
}

impl std::fmt::Debug for TextLayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextLayoutEngine")
            .field("family_name", &self.family_name)
            .field("font_bytes", &self.font.data.len())
            .finish()
    }
}

impl TextLayoutEngine {
    /// Register `font` and prepare fresh Parley contexts.
    pub fn new(font: FontBytes) -> PosterResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.data.as_ref().clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| PosterError::asset("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PosterError::asset("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family_name, "registered poster font");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Resolve a font via [`resolve_font_bytes`] and build an engine from it.
    pub fn discover(path: Option<&Path>) -> PosterResult<Option<Self>> {
        resolve_font_bytes(path)?.map(Self::new).transpose()
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn font(&self) -> &FontBytes {
        &self.font
    }

    /// Shape `text` as a single unwrapped line.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: FontSpec,
        brush: Rgba8,
    ) -> PosterResult<parley::Layout<Rgba8>> {
        if !font.size_px.is_finite() || font.size_px <= 0.0 {
            return Err(PosterError::validation("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasure for TextLayoutEngine {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        match self.layout_line(text, font, Rgba8::default()) {
            Ok(layout) => f64::from(layout.width()),
            Err(err) => {
                tracing::warn!(error = %err, "text layout failed; using approximate metrics");
                ApproxMetrics.measure(text, font)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
