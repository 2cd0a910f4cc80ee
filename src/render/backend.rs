use crate::foundation::error::PosterResult;
use crate::render::compositor::{PosterScene, RenderSettings, compose_poster};
use crate::render::plan::PosterPlan;
use crate::text::engine::TextMeasure;

/// A rendered poster as RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Whether any pixel has non-zero alpha.
    pub fn has_coverage(&self) -> bool {
        self.data.chunks_exact(4).any(|px| px[3] != 0)
    }

    /// Straight-alpha RGBA8 pixel at `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(self.data.get(idx..idx + 4)?);
        if self.premultiplied {
            crate::foundation::math::unpremultiply_rgba8_in_place(&mut px);
        }
        Some(px)
    }
}

/// Something that can turn a [`PosterPlan`] into pixels.
///
/// Renderers also own the text measurer used for layout so that measured
/// widths match the glyphs they draw.
pub trait PosterRenderer {
    /// Execute a plan and read back the frame.
    fn render_plan(&mut self, plan: &PosterPlan) -> PosterResult<FrameRGBA>;

    fn text_measure(&mut self) -> &mut dyn TextMeasure;

    /// Compose and render in one step.
    fn render_scene(
        &mut self,
        scene: &PosterScene,
        settings: &RenderSettings,
    ) -> PosterResult<FrameRGBA> {
        let plan = compose_poster(scene, self.text_measure(), settings)?;
        self.render_plan(&plan)
    }
}
