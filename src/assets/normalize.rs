use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::tempfile::temp_path;

/// Source art normalized to canvas size.
///
/// When the source was already canvas-sized the original file is passed
/// through untouched. Otherwise a temporary PNG holds the resampled pixels
/// and is removed when this value is dropped.
#[derive(Debug)]
pub struct NormalizedArt {
    path: PathBuf,
    resampled: bool,
}

impl NormalizedArt {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `false` means the original file was passed through unchanged.
    pub fn is_resampled(&self) -> bool {
        self.resampled
    }
}

impl Drop for NormalizedArt {
    fn drop(&mut self) {
        if self.resampled
            && let Err(e) = std::fs::remove_file(&self.path)
        {
            tracing::debug!(
                "failed to remove normalized art '{}': {e}",
                self.path.display()
            );
        }
    }
}

/// Unsharp pass applied after resampling to compensate for interpolation
/// blur.
#[derive(Clone, Copy, Debug)]
pub struct SharpenOpts {
    /// Gaussian blur sigma of the unsharp mask.
    pub sigma: f32,
    /// Minimum brightness delta for a pixel to be sharpened.
    pub threshold: i32,
}

impl Default for SharpenOpts {
    fn default() -> Self {
        Self {
            sigma: 0.6,
            threshold: 2,
        }
    }
}

/// Resample `src` to exactly `canvas` size.
///
/// Canvas-sized sources are returned as-is, byte-for-byte. Everything else is
/// converted to RGBA (transparency survives the resample), scaled with a
/// Lanczos3 filter, sharpened, and written to a temporary PNG.
pub fn normalize_to_canvas(
    src: &Path,
    canvas: Canvas,
    sharpen: SharpenOpts,
) -> CoverResult<NormalizedArt> {
    let (width, height) = image::image_dimensions(src).map_err(|e| {
        CoverError::art_decode(format!("failed to read art '{}': {e}", src.display()))
    })?;
    if canvas.matches(width, height) {
        return Ok(NormalizedArt {
            path: src.to_path_buf(),
            resampled: false,
        });
    }

    let img = image::open(src).map_err(|e| {
        CoverError::art_decode(format!("failed to decode art '{}': {e}", src.display()))
    })?;
    let rgba = img.to_rgba8();
    let resized = image::imageops::resize(
        &rgba,
        canvas.width,
        canvas.height,
        image::imageops::FilterType::Lanczos3,
    );
    let sharpened = image::imageops::unsharpen(&resized, sharpen.sigma, sharpen.threshold);

    let tmp = temp_path("storycover_art", "png");
    sharpened
        .save(&tmp)
        .with_context(|| format!("write normalized art '{}'", tmp.display()))?;

    Ok(NormalizedArt {
        path: tmp,
        resampled: true,
    })
}
