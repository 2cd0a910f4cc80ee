use std::sync::Arc;
use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::assets::decode::PosterImage;
use crate::assets::source::{ImageSlot, ImageSource, ImageTicket, load_image_source};
use crate::copy::generator::{CopyGenerator, GeneratedCopy};
use crate::copy::templates::CopyTemplates;
use crate::foundation::error::PosterResult;
use crate::poster::form::{BulletList, FormField, PosterForm};
use crate::render::compositor::PosterScene;
use crate::style::catalog::{StyleCatalog, StylePreset};

/// Delay hosts may insert between [`PosterStudio::request_copy`] and
/// [`PosterStudio::commit_copy`] to mimic a remote copywriter.
pub const COPY_LATENCY: Duration = Duration::from_millis(520);

/// A user edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StudioEvent {
    SelectStyle(String),
    SetField(FormField, String),
    SetBullet(usize, String),
    AddBullet,
    RemoveBullet(usize),
}

/// A pending copy refresh. Only the most recently requested ticket can be committed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct CopyTicket {
    generation: u64,
    copy: GeneratedCopy,
}

impl CopyTicket {
    pub fn copy(&self) -> &GeneratedCopy {
        &self.copy
    }
}

/// Editable poster state. Every change bumps [`PosterStudio::revision`].
pub struct PosterStudio<R> {
    catalog: Arc<StyleCatalog>,
    style_id: String,
    form: PosterForm,
    bullets: BulletList,
    image: ImageSlot,
    generator: CopyGenerator<R>,
    fallback_accent: String,
    revision: u64,
    copy_issued: u64,
    generating: bool,
}

impl PosterStudio<StdRng> {
    pub fn seeded(catalog: Arc<StyleCatalog>, templates: Arc<CopyTemplates>, seed: u64) -> Self {
        Self::new(catalog, templates, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PosterStudio<R> {
    /// Start with the first style, default copy and no image.
    pub fn new(catalog: Arc<StyleCatalog>, templates: Arc<CopyTemplates>, rng: R) -> Self {
        let mut generator = CopyGenerator::new(templates, rng);
        let fallback_accent = generator.pick_accent();
        Self {
            style_id: catalog.first().id.clone(),
            catalog,
            form: PosterForm::default(),
            bullets: BulletList::default(),
            image: ImageSlot::new(),
            generator,
            fallback_accent,
            revision: 0,
            copy_issued: 0,
            generating: false,
        }
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    pub fn style(&self) -> &StylePreset {
        self.catalog.get_style(&self.style_id)
    }

    pub fn form(&self) -> &PosterForm {
        &self.form
    }

    pub fn bullets(&self) -> &BulletList {
        &self.bullets
    }

    pub fn image(&self) -> Option<&Arc<PosterImage>> {
        self.image.current()
    }

    pub fn fallback_accent(&self) -> &str {
        &self.fallback_accent
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Apply an edit; returns whether anything changed.
    pub fn apply(&mut self, event: StudioEvent) -> bool {
        let changed = match event {
            StudioEvent::SelectStyle(id) => {
                // Unknown ids resolve to the first preset.
                let resolved = self.catalog.get_style(&id).id.clone();
                if resolved == self.style_id {
                    false
                } else {
                    tracing::debug!(from = %self.style_id, to = %resolved, "style selected");
                    self.style_id = resolved;
                    true
                }
            }
            StudioEvent::SetField(field, value) => {
                let changed = self.form.set(field, value);
                if changed && field == FormField::Accent && self.form.accent.is_empty() {
                    self.fallback_accent = self.generator.pick_accent();
                }
                changed
            }
            StudioEvent::SetBullet(index, value) => self.bullets.update_bullet(index, value),
            StudioEvent::AddBullet => self.bullets.add_bullet(),
            StudioEvent::RemoveBullet(index) => self.bullets.remove_bullet(index),
        };
        if changed {
            self.bump();
        }
        changed
    }

    /// Replace the whole form and bullet list, e.g. when opening a saved document.
    pub fn restore(&mut self, form: PosterForm, bullets: BulletList) -> bool {
        if form == self.form && bullets == self.bullets {
            return false;
        }
        let accent_cleared = form.accent.is_empty() && !self.form.accent.is_empty();
        self.form = form;
        self.bullets = bullets;
        if accent_cleared {
            self.fallback_accent = self.generator.pick_accent();
        }
        self.bump();
        true
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Start loading `source`; earlier pending loads become stale.
    pub fn begin_image_load(&mut self, source: &ImageSource) -> ImageTicket {
        tracing::debug!(source = %source.label(), "image load started");
        self.image.begin()
    }

    /// Complete a load started with [`Self::begin_image_load`].
    pub fn finish_image_load(
        &mut self,
        ticket: ImageTicket,
        result: PosterResult<PosterImage>,
    ) -> bool {
        let changed = self.image.finish(ticket, result);
        if changed {
            self.bump();
        }
        changed
    }

    /// Load and decode `source` synchronously.
    pub fn load_image(&mut self, source: &ImageSource) -> bool {
        let ticket = self.begin_image_load(source);
        let result = load_image_source(source);
        self.finish_image_load(ticket, result)
    }

    /// Switch back to the bundled sample artwork.
    pub fn reset_image(&mut self) -> bool {
        self.load_image(&ImageSource::Sample)
    }

    /// Drop the image so the placeholder frame is drawn.
    pub fn clear_image(&mut self) -> bool {
        let changed = self.image.clear();
        if changed {
            self.bump();
        }
        changed
    }

    /// Draft new copy from the current state. Apply it with [`Self::commit_copy`].
    pub fn request_copy(&mut self) -> CopyTicket {
        self.copy_issued += 1;
        self.generating = true;
        let copy = self
            .generator
            .generate(&self.form, self.catalog.get_style(&self.style_id), self.bullets.as_slice());
        CopyTicket {
            generation: self.copy_issued,
            copy,
        }
    }

    /// Apply a drafted copy if no newer request superseded it.
    pub fn commit_copy(&mut self, ticket: CopyTicket) -> bool {
        if ticket.generation != self.copy_issued {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.copy_issued,
                "dropping stale copy refresh"
            );
            return false;
        }
        let GeneratedCopy {
            tagline,
            description,
            cta,
            accent,
            bullets,
        } = ticket.copy;
        self.form.tagline = tagline;
        self.form.description = description;
        self.form.cta = cta;
        self.form.accent = accent;
        self.bullets = BulletList::new(bullets);
        self.generating = false;
        self.bump();
        true
    }

    /// Request and immediately commit a copy refresh.
    pub fn refresh_copy(&mut self) -> bool {
        let ticket = self.request_copy();
        self.commit_copy(ticket)
    }

    /// Snapshot of everything the compositor needs.
    pub fn scene(&self) -> PosterScene {
        PosterScene {
            style: self.style().clone(),
            form: self.form.clone(),
            bullets: self.bullets.clone(),
            image: self.image.current().cloned(),
            fallback_accent: self.fallback_accent.clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/session.rs"]
mod tests;
