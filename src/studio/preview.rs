use rand::Rng;

use crate::export::png::{Download, export_download};
use crate::foundation::error::{PosterError, PosterResult};
use crate::render::backend::{FrameRGBA, PosterRenderer};
use crate::render::compositor::RenderSettings;
use crate::studio::session::PosterStudio;

/// Re-renders a studio whenever its revision moves past the last rendered one.
///
/// With no renderer attached, refreshes are skipped.
pub struct LivePreview {
    renderer: Option<Box<dyn PosterRenderer>>,
    settings: RenderSettings,
    rendered_revision: Option<u64>,
    frame: Option<FrameRGBA>,
    product_name: String,
}

impl LivePreview {
    pub fn new(renderer: Option<Box<dyn PosterRenderer>>, settings: RenderSettings) -> Self {
        Self {
            renderer,
            settings,
            rendered_revision: None,
            frame: None,
            product_name: String::new(),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Change output settings; the next refresh redraws.
    pub fn set_settings(&mut self, settings: RenderSettings) {
        if settings != self.settings {
            self.settings = settings;
            self.invalidate();
        }
    }

    pub fn set_renderer(&mut self, renderer: Option<Box<dyn PosterRenderer>>) {
        self.renderer = renderer;
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.rendered_revision = None;
    }

    pub fn rendered_revision(&self) -> Option<u64> {
        self.rendered_revision
    }

    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    /// Render if the studio changed since the last frame. Returns whether a frame was produced.
    pub fn refresh<R: Rng>(&mut self, studio: &PosterStudio<R>) -> bool {
        let revision = studio.revision();
        if self.rendered_revision == Some(revision) {
            return false;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            tracing::debug!(revision, "no renderer attached; preview skipped");
            return false;
        };

        match renderer.render_scene(&studio.scene(), &self.settings) {
            Ok(frame) => {
                self.frame = Some(frame);
                self.rendered_revision = Some(revision);
                self.product_name = studio.form().product_name.clone();
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, revision, "poster render failed; keeping last frame");
                false
            }
        }
    }

    /// PNG export of the last rendered frame.
    pub fn download(&self) -> PosterResult<Download> {
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| PosterError::render("no poster has been rendered yet"))?;
        export_download(frame, &self.product_name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/preview.rs"]
mod tests;
