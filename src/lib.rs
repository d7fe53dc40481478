//! Storycover builds a square cover image for an audio-story package and
//! optionally embeds it into every MP3 track of that package.
//!
//! The pipeline is sequential: locate the source art, normalize it to the
//! cover canvas, wrap and place the text, compose an SVG scene, rasterize it
//! through a prioritized chain of backends, encode the result as JPEG, then
//! hand the artifact to the track tagger.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod audio;
pub mod config;
pub mod encode;
pub mod layout;
pub mod package;
pub mod pipeline;
pub mod render;
pub mod scene;

pub use crate::assets::normalize::{NormalizedArt, SharpenOpts, normalize_to_canvas};
pub use crate::assets::palette::Palette;
pub use crate::config::BuildConfig;
pub use crate::foundation::core::{COVER_CANVAS, Canvas};
pub use crate::foundation::error::{CoverError, CoverResult};
pub use crate::layout::metrics::{TextMetrics, compute_metrics};
pub use crate::layout::wrap::{WrapOpts, wrap_lines};
pub use crate::pipeline::{BuildOutcome, build_cover};
pub use crate::render::backend::{
    RasterBackend, RenderedImage, TierFailure, default_backends, render_with_fallback,
};
pub use crate::scene::model::{EmbeddedArt, Scene};
