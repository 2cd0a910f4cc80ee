use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PosterError, PosterResult};

/// Background texture drawn over the gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    #[default]
    None,
    Grid,
    Dots,
    Diagonal,
    Waves,
}

/// Arrangement family controlling text alignment and bullet rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    #[default]
    Split,
    Center,
    Hero,
}

impl LayoutKind {
    /// `split` and `hero` set copy flush left; `center` centers everything.
    pub fn is_left_aligned(self) -> bool {
        matches!(self, Self::Split | Self::Hero)
    }
}

/// Horizontal placement of the product image and accent orb.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Corner treatment of the call-to-action block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaShape {
    #[default]
    Pill,
    Bar,
}

impl CtaShape {
    pub fn corner_radius(self) -> f64 {
        match self {
            Self::Pill => 40.0,
            Self::Bar => 18.0,
        }
    }
}

/// Color palette of a style preset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    /// Background gradient stops, top-left to bottom-right.
    pub gradient: [Rgba8; 2],
    pub accent: Rgba8,
    /// Text color drawn on top of `accent` fills.
    pub accent_text: Rgba8,
    pub secondary: Rgba8,
    pub text: Rgba8,
    pub subtext: Rgba8,
    pub panel: Rgba8,
    pub shadow: Rgba8,
}

/// A named bundle of palette, pattern, layout, alignment and CTA shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StylePreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub palette: Palette,
    #[serde(default)]
    pub pattern: PatternKind,
    #[serde(default)]
    pub layout: LayoutKind,
    #[serde(default)]
    pub image_alignment: ImageAlignment,
    #[serde(default)]
    pub cta_style: CtaShape,
}

/// Immutable, non-empty list of style presets.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleCatalog {
    styles: Vec<StylePreset>,
}

impl StyleCatalog {
    /// Build a catalog; the first preset is the fallback for unknown ids.
    pub fn new(styles: Vec<StylePreset>) -> PosterResult<Self> {
        if styles.is_empty() {
            return Err(PosterError::validation(
                "style catalog must contain at least one preset",
            ));
        }
        for (i, s) in styles.iter().enumerate() {
            if s.id.trim().is_empty() {
                return Err(PosterError::validation(format!(
                    "style preset #{i} has an empty id"
                )));
            }
            if styles[..i].iter().any(|prev| prev.id == s.id) {
                return Err(PosterError::validation(format!(
                    "duplicate style id '{}'",
                    s.id
                )));
            }
        }
        Ok(Self { styles })
    }

    /// Parse a JSON array of presets.
    pub fn from_json_str(json: &str) -> PosterResult<Self> {
        let styles: Vec<StylePreset> = serde_json::from_str(json)?;
        Self::new(styles)
    }

    /// Read a JSON array of presets from disk.
    pub fn from_path(path: &Path) -> PosterResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read style catalog '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn list_styles(&self) -> &[StylePreset] {
        &self.styles
    }

    /// Lookup by id, falling back to the first preset.
    pub fn get_style(&self, id: &str) -> &StylePreset {
        self.styles
            .iter()
            .find(|s| s.id == id)
            .unwrap_or(&self.styles[0])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.styles.iter().any(|s| s.id == id)
    }

    pub fn first(&self) -> &StylePreset {
        &self.styles[0]
    }

    /// The three presets shipped with PosterCraft: `neon`, `minimal` and `organic`.
    pub fn builtin() -> Self {
        Self {
            styles: vec![
                StylePreset {
                    id: "neon".to_string(),
                    name: "Launch Neon".to_string(),
                    description: "High-energy gradient built for tech drops & bold promos."
                        .to_string(),
                    palette: Palette {
                        gradient: [Rgba8::opaque(0x03, 0x07, 0x12), Rgba8::opaque(0x12, 0x20, 0x60)],
                        accent: Rgba8::opaque(0x38, 0xbd, 0xf8),
                        accent_text: Rgba8::opaque(0x02, 0x06, 0x17),
                        secondary: Rgba8::opaque(0xa5, 0xb4, 0xfc),
                        text: Rgba8::opaque(0xf8, 0xfa, 0xfc),
                        subtext: Rgba8::new(226, 232, 240, 199),
                        panel: Rgba8::new(15, 23, 42, 133),
                        shadow: Rgba8::new(2, 132, 199, 97),
                    },
                    pattern: PatternKind::Diagonal,
                    layout: LayoutKind::Split,
                    image_alignment: ImageAlignment::Right,
                    cta_style: CtaShape::Pill,
                },
                StylePreset {
                    id: "minimal".to_string(),
                    name: "Minimal Glow".to_string(),
                    description: "Soft gradients, centered layout and modern editorial feel."
                        .to_string(),
                    palette: Palette {
                        gradient: [Rgba8::opaque(0x0f, 0x17, 0x2a), Rgba8::opaque(0x1e, 0x29, 0x3b)],
                        accent: Rgba8::opaque(0xfb, 0xbf, 0x24),
                        accent_text: Rgba8::opaque(0x0f, 0x17, 0x2a),
                        secondary: Rgba8::opaque(0xf8, 0xfa, 0xfc),
                        text: Rgba8::opaque(0xf1, 0xf5, 0xf9),
                        subtext: Rgba8::new(241, 245, 249, 191),
                        panel: Rgba8::new(255, 255, 255, 20),
                        shadow: Rgba8::new(255, 255, 255, 31),
                    },
                    pattern: PatternKind::Waves,
                    layout: LayoutKind::Center,
                    image_alignment: ImageAlignment::Center,
                    cta_style: CtaShape::Pill,
                },
                StylePreset {
                    id: "organic".to_string(),
                    name: "Organic Fresh".to_string(),
                    description: "Earthy gradients and textured grids for wellness brands."
                        .to_string(),
                    palette: Palette {
                        gradient: [Rgba8::opaque(0x05, 0x2e, 0x16), Rgba8::opaque(0x0f, 0x17, 0x2a)],
                        accent: Rgba8::opaque(0x4a, 0xde, 0x80),
                        accent_text: Rgba8::opaque(0x02, 0x2c, 0x22),
                        secondary: Rgba8::opaque(0xbb, 0xf7, 0xd0),
                        text: Rgba8::opaque(0xec, 0xfd, 0xf5),
                        subtext: Rgba8::new(209, 250, 229, 209),
                        panel: Rgba8::new(15, 118, 110, 89),
                        shadow: Rgba8::new(16, 185, 129, 107),
                    },
                    pattern: PatternKind::Grid,
                    layout: LayoutKind::Hero,
                    image_alignment: ImageAlignment::Left,
                    cta_style: CtaShape::Bar,
                },
            ],
        }
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/catalog.rs"]
mod tests;
