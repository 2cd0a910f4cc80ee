//! PosterCraft composes single-image marketing posters.
//!
//! A poster is a style preset, editable copy and an optional product image. The
//! pipeline is:
//!
//! - Edit state in a [`PosterStudio`] (or load a [`PosterDocument`])
//! - Lay it out with [`compose_poster`] into a backend-agnostic [`PosterPlan`]
//! - Rasterize the plan with [`CpuBackend`] and export it as PNG
//!
//! Copy refresh ("AI Refresh") is seeded template substitution, not a model call.
#![forbid(unsafe_code)]

pub mod assets;
pub mod copy;
pub mod export;
pub mod foundation;
pub mod poster;
pub mod render;
pub mod studio;
pub mod style;
pub mod text;

pub use crate::foundation::core::{Affine, BezPath, CanvasSize, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{PosterError, PosterResult};

pub use crate::assets::decode::PosterImage;
pub use crate::assets::source::{ImageSlot, ImageSource, ImageTicket, load_image_source};
pub use crate::copy::generator::{CopyGenerator, GeneratedCopy};
pub use crate::copy::templates::CopyTemplates;
pub use crate::export::png::{
    Download, download_filename, encode_png, export_download, png_data_url,
};
pub use crate::poster::document::PosterDocument;
pub use crate::poster::form::{BulletList, FormField, PosterForm};
pub use crate::render::backend::{FrameRGBA, PosterRenderer};
pub use crate::render::compositor::{PosterScene, RenderSettings, compose_poster};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::plan::{DrawOp, PosterPlan};
pub use crate::studio::preview::LivePreview;
pub use crate::studio::session::{CopyTicket, PosterStudio, StudioEvent};
pub use crate::style::catalog::{StyleCatalog, StylePreset};
pub use crate::text::engine::{ApproxMetrics, FontSpec, TextLayoutEngine, TextMeasure};
pub use crate::text::wrap::wrap_lines;
