use std::path::Path;

use crate::assets::palette::Palette;
use crate::foundation::core::Canvas;
use crate::foundation::error::{CoverError, CoverResult};
use crate::layout::metrics::TextMetrics;

/// Raster art carried inline by a scene.
///
/// The bytes are embedded into the markup as a data URI, which makes the
/// serialized scene fully self-contained: rendering never depends on an
/// external path staying valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedArt {
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Encoded image bytes as they appeared on disk.
    pub bytes: Vec<u8>,
}

impl EmbeddedArt {
    /// Read an image file into an embeddable form, inferring the MIME type
    /// from the file extension.
    pub fn from_path(path: &Path) -> CoverResult<Self> {
        let mime = mime_for_extension(path);
        let bytes = std::fs::read(path).map_err(|e| {
            CoverError::art_decode(format!("failed to read art '{}': {e}", path.display()))
        })?;
        Ok(Self { mime, bytes })
    }
}

fn mime_for_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Immutable description of everything to be rasterized, sized exactly to
/// its canvas. A pure value: composing a scene performs no I/O.
#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: Canvas,
    pub palette: Palette,
    /// Optional art; absent means the scene has no art element at all.
    pub art: Option<EmbeddedArt>,
    /// Wrapped title lines; empty means the title element is omitted.
    pub title_lines: Vec<String>,
    /// Wrapped subtitle lines; empty means the subtitle element is omitted.
    pub subtitle_lines: Vec<String>,
    /// Optional badge label; absent means no badge plate is drawn.
    pub badge: Option<String>,
    pub metrics: TextMetrics,
}
