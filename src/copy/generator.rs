use std::collections::HashSet;
use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::copy::templates::CopyTemplates;
use crate::poster::form::PosterForm;
use crate::style::catalog::StylePreset;

/// Upper bound on the bullet list returned by a refresh.
pub const MAX_GENERATED_BULLETS: usize = 4;
/// Fragments sampled (with replacement) per refresh.
pub const FRESH_BULLET_SAMPLES: usize = 3;

const PRODUCT_PLACEHOLDER: &str = "{product}";
const BRAND_PLACEHOLDER: &str = "{brand}";
const DEFAULT_PRODUCT: &str = "your product";
const DEFAULT_BRAND: &str = "your brand";

/// Output of one "AI Refresh".
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GeneratedCopy {
    pub tagline: String,
    pub description: String,
    pub cta: String,
    pub accent: String,
    pub bullets: Vec<String>,
}

/// Substitute every `{product}` and `{brand}` placeholder.
///
/// Blank values fall back to "your product" / "your brand".
pub fn fill_template(template: &str, product: &str, brand: &str) -> String {
    let product = match product.trim() {
        "" => DEFAULT_PRODUCT,
        p => p,
    };
    let brand = match brand.trim() {
        "" => DEFAULT_BRAND,
        b => b,
    };
    template
        .replace(PRODUCT_PLACEHOLDER, product)
        .replace(BRAND_PLACEHOLDER, brand)
}

/// Template-driven copy writer with an injected random source.
pub struct CopyGenerator<R> {
    templates: Arc<CopyTemplates>,
    rng: R,
}

impl CopyGenerator<StdRng> {
    /// Deterministic generator for a given seed.
    pub fn seeded(templates: Arc<CopyTemplates>, seed: u64) -> Self {
        Self::new(templates, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CopyGenerator<R> {
    pub fn new(templates: Arc<CopyTemplates>, rng: R) -> Self {
        Self { templates, rng }
    }

    pub fn templates(&self) -> &CopyTemplates {
        &self.templates
    }

    /// Draft new tagline, description, CTA, accent and bullets for `style`.
    pub fn generate(
        &mut self,
        form: &PosterForm,
        style: &StylePreset,
        bullets: &[String],
    ) -> GeneratedCopy {
        let templates = Arc::clone(&self.templates);
        let family = templates.family_for(&style.id);
        let product = form.product_name.as_str();
        let brand = form.brand_name.as_str();

        let tagline = fill_template(pick(&mut self.rng, &family.taglines), product, brand);
        let description =
            fill_template(pick(&mut self.rng, &family.descriptions), product, brand);
        let cta = fill_template(pick(&mut self.rng, &family.ctas), product, brand);

        let fresh: Vec<&str> = (0..FRESH_BULLET_SAMPLES)
            .map(|_| pick(&mut self.rng, &family.bullet_fragments))
            .collect();
        let merged = dedup_bullets(
            bullets
                .iter()
                .map(String::as_str)
                .chain(fresh.iter().copied()),
        );

        tracing::debug!(style = %style.id, family = %family.key, "generated poster copy");
        GeneratedCopy {
            tagline,
            description,
            cta,
            accent: self.pick_accent(),
            bullets: merged,
        }
    }

    /// Uniform choice from the accent label pool.
    pub fn pick_accent(&mut self) -> String {
        let templates = Arc::clone(&self.templates);
        pick(&mut self.rng, templates.accent_pool()).to_string()
    }
}

fn pick<'a, R: Rng>(rng: &mut R, items: &'a [String]) -> &'a str {
    if items.is_empty() {
        return "";
    }
    &items[rng.random_range(0..items.len())]
}

/// Trim, drop blanks, keep first occurrences and cap at [`MAX_GENERATED_BULLETS`].
fn dedup_bullets<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(MAX_GENERATED_BULLETS);
    for item in items {
        let item = item.trim();
        if item.is_empty() || !seen.insert(item) {
            continue;
        }
        out.push(item.to_string());
        if out.len() == MAX_GENERATED_BULLETS {
            break;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/copy/generator.rs"]
mod tests;
