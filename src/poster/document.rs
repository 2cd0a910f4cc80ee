use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use rand::{SeedableRng, rngs::StdRng};

use crate::assets::source::ImageSource;
use crate::copy::templates::CopyTemplates;
use crate::foundation::error::PosterResult;
use crate::poster::form::{BulletList, PosterForm};
use crate::render::compositor::RenderSettings;
use crate::studio::session::{PosterStudio, StudioEvent};
use crate::style::catalog::StyleCatalog;

/// `image` value that asks for the placeholder frame instead of artwork.
pub const NO_IMAGE: &str = "none";

/// A saved poster: copy, style choice, artwork and output settings.
///
/// Relative `image`, `font` and `catalog` paths resolve against the directory
/// the document was read from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PosterDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub form: PosterForm,
    pub bullets: BulletList,
    /// Path, `data:` URL, or `"none"`. Absent means the bundled sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub device_pixel_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for PosterDocument {
    fn default() -> Self {
        Self {
            style: None,
            form: PosterForm::default(),
            bullets: BulletList::default(),
            image: None,
            device_pixel_ratio: 1.0,
            font: None,
            seed: None,
            catalog: None,
            base_dir: PathBuf::from("."),
        }
    }
}

impl PosterDocument {
    pub fn from_json_str(json: &str, base_dir: &Path) -> PosterResult<Self> {
        let mut doc: Self = serde_json::from_str(json)?;
        doc.base_dir = base_dir.to_path_buf();
        doc.render_settings().validate()?;
        Ok(doc)
    }

    pub fn from_path(path: &Path) -> PosterResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read poster document '{}'", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_str(&json, base_dir)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// `None` means no artwork (placeholder frame).
    pub fn image_source(&self) -> Option<ImageSource> {
        match self.image.as_deref().map(str::trim) {
            None => Some(ImageSource::Sample),
            Some(s) if s.is_empty() || s.eq_ignore_ascii_case(NO_IMAGE) => None,
            Some(s) if s.starts_with("data:") => Some(ImageSource::DataUrl(s.to_string())),
            Some(s) => Some(ImageSource::Path(self.resolve(Path::new(s)))),
        }
    }

    pub fn font_path(&self) -> Option<PathBuf> {
        self.font.as_deref().map(|p| self.resolve(p))
    }

    /// The referenced catalog, or the built-in presets.
    pub fn load_catalog(&self) -> PosterResult<StyleCatalog> {
        match &self.catalog {
            Some(p) => StyleCatalog::from_path(&self.resolve(p)),
            None => Ok(StyleCatalog::builtin()),
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings::with_device_pixel_ratio(self.device_pixel_ratio)
    }

    /// Build an editable studio from this document. `seed` overrides the document seed.
    ///
    /// An image that fails to load leaves the studio on the placeholder frame.
    pub fn open_studio(&self, seed: Option<u64>) -> PosterResult<PosterStudio<StdRng>> {
        let catalog = Arc::new(self.load_catalog()?);
        if let Some(id) = &self.style
            && !catalog.contains(id)
        {
            tracing::warn!(style = %id, "unknown style id; using first preset");
        }
        let templates = Arc::new(CopyTemplates::builtin());
        let rng = match seed.or(self.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut studio = PosterStudio::new(catalog, templates, rng);
        if let Some(id) = &self.style {
            studio.apply(StudioEvent::SelectStyle(id.clone()));
        }
        studio.restore(self.form.clone(), self.bullets.clone());
        if let Some(source) = self.image_source() {
            studio.load_image(&source);
        }
        Ok(studio)
    }

    /// Write the document as pretty JSON.
    pub fn to_json_string(&self) -> PosterResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/poster/document.rs"]
mod tests;
