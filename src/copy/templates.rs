use crate::foundation::error::{PosterError, PosterResult};

/// Phrase templates for one creative direction.
///
/// Templates may contain `{product}` and `{brand}` placeholders.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CopyFamily {
    /// Style id this family answers to.
    pub key: String,
    pub taglines: Vec<String>,
    pub descriptions: Vec<String>,
    pub ctas: Vec<String>,
    /// Short highlight fragments sampled into bullet lists.
    pub bullet_fragments: Vec<String>,
}

/// Immutable template data used by the copy generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyTemplates {
    families: Vec<CopyFamily>,
    accent_pool: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl CopyTemplates {
    /// Build template data; every family needs at least one entry per list and the accent pool
    /// must be non-empty.
    pub fn new(
        families: Vec<CopyFamily>,
        accent_pool: Vec<String>,
    ) -> PosterResult<Self> {
        if families.is_empty() {
            return Err(PosterError::validation(
                "copy templates need at least one family",
            ));
        }
        if accent_pool.is_empty() {
            return Err(PosterError::validation(
                "copy templates need a non-empty accent pool",
            ));
        }
        for f in &families {
            if f.taglines.is_empty()
                || f.descriptions.is_empty()
                || f.ctas.is_empty()
                || f.bullet_fragments.is_empty()
            {
                return Err(PosterError::validation(format!(
                    "copy family '{}' has an empty template list",
                    f.key
                )));
            }
        }
        Ok(Self {
            families,
            accent_pool,
        })
    }

    /// Family for a style id; unknown ids use the first family.
    pub fn family_for(&self, style_id: &str) -> &CopyFamily {
        self.families
            .iter()
            .find(|f| f.key == style_id)
            .unwrap_or(&self.families[0])
    }

    pub fn families(&self) -> &[CopyFamily] {
        &self.families
    }

    pub fn accent_pool(&self) -> &[String] {
        &self.accent_pool
    }

    pub fn builtin() -> Self {
        let families = vec![
            CopyFamily {
                key: "neon".to_string(),
                taglines: strings(&[
                    "Fuel {brand} with {product}",
                    "{product}: engineered for momentum",
                    "Meet the future of {brand}",
                    "Push past ordinary with {product}",
                ]),
                descriptions: strings(&[
                    "Precision-crafted for teams who move fast — bright notes, clean caffeine, zero crash.",
                    "A layered profile of citrus, caramel, and cacao that keeps strategy sessions dialed in.",
                    "Built in micro-batches for makers chasing the next big launch.",
                ]),
                ctas: strings(&[
                    "Unlock {product}",
                    "Reserve your supply",
                    "Upgrade your studio bar",
                ]),
                bullet_fragments: strings(&[
                    "Crafted for launch nights",
                    "Silky nitro texture",
                    "Zero jitter microdose",
                    "Bright citrus finish",
                    "Sustainable aluminum vessel",
                ]),
            },
            CopyFamily {
                key: "minimal".to_string(),
                taglines: strings(&[
                    "{product}, distilled for everyday calm",
                    "Quiet power in every pour",
                    "Elevate routine with {product}",
                    "Design-forward flavor for focused days",
                ]),
                descriptions: strings(&[
                    "Cold-steeped 18 hours for a velvet texture that plays nice with late-night edits.",
                    "Balanced sweetness and natural clarity, designed for studios that stay in motion.",
                    "Silky concentrate with adaptive botanicals to keep your pace calm and confident.",
                ]),
                ctas: strings(&[
                    "Bring {product} home",
                    "Add to your ritual",
                    "Blend a calmer morning",
                ]),
                bullet_fragments: strings(&[
                    "18-hour cold steep",
                    "Velvet vanilla finish",
                    "Low-acid extraction",
                    "Pairs with tonic or oat",
                    "Ready in 30 seconds",
                ]),
            },
            CopyFamily {
                key: "organic".to_string(),
                taglines: strings(&[
                    "Harvested energy in every sip",
                    "Plant-powered clarity starts here",
                    "{product}: ritual-ready and rooted",
                    "Pure botanicals, pure momentum",
                ]),
                descriptions: strings(&[
                    "Organic beans infused with adaptogens and nervines for grounded energy.",
                    "Whole-plant nutrition meets nuanced flavor — brewed slow, bottled fresh.",
                    "Clean, sustainable, and vibrant — your daily ritual reimagined.",
                ]),
                ctas: strings(&[
                    "Taste the first press",
                    "Stock the studio fridge",
                    "Sip the slow energy",
                ]),
                bullet_fragments: strings(&[
                    "Botanical adaptogen stack",
                    "USDA organic & fair trade",
                    "Naturally sweet cacao finish",
                    "Sun-dried single origin",
                    "Compostable packaging",
                ]),
            },
        ];

        let accent_pool = strings(&[
            "Creator Favorite",
            "Drop Two",
            "Launch Day",
            "Limited Edition",
            "Made for Motion",
            "New Release",
            "Small Batch",
            "Studio Essential",
        ]);

        Self {
            families,
            accent_pool,
        }
    }
}

impl Default for CopyTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}
