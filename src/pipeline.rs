use std::path::PathBuf;

use anyhow::Context as _;

use crate::assets::locate::find_art;
use crate::assets::normalize::{SharpenOpts, normalize_to_canvas};
use crate::assets::palette::Palette;
use crate::audio::tag::{TagOpts, TagOutcome, embed_cover_in_tracks};
use crate::config::BuildConfig;
use crate::encode::jpeg::write_jpeg;
use crate::foundation::core::COVER_CANVAS;
use crate::foundation::error::CoverResult;
use crate::foundation::tempfile::TempFileGuard;
use crate::layout::metrics::compute_metrics;
use crate::layout::wrap::wrap_lines;
use crate::package::archive::{delete_source_art, zip_package_folder};
use crate::render::backend::{default_backends, render_with_fallback};
use crate::scene::compose::compose;
use crate::scene::model::EmbeddedArt;

/// Everything a finished build produced.
#[derive(Debug)]
pub struct BuildOutcome {
    /// The cover artifact, inside the package folder.
    pub cover_path: PathBuf,
    /// Per-track tagging results, in track order; empty when embedding was
    /// disabled or skipped.
    pub tag_outcomes: Vec<TagOutcome>,
    /// The package bundle, when archive mode was on and bundling succeeded.
    pub archive_path: Option<PathBuf>,
}

impl BuildOutcome {
    /// Tracks whose tagging attempt failed.
    pub fn failed_tracks(&self) -> impl Iterator<Item = &TagOutcome> {
        self.tag_outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Run the full cover pipeline described by `config`.
///
/// Stages run sequentially; every temporary artifact is scoped to its stage
/// and removed on success and on failure alike. A fatal error leaves no
/// partial cover under the final name.
pub fn build_cover(config: &BuildConfig) -> CoverResult<BuildOutcome> {
    config.validate()?;

    let palette = Palette::load(&config.palette)?;

    let outdir = config.base.join(&config.slug);
    std::fs::create_dir_all(&outdir)
        .with_context(|| format!("create package folder '{}'", outdir.display()))?;
    let out_name = config
        .out_name
        .clone()
        .unwrap_or_else(|| format!("{}_cover.jpg", config.slug));
    let out_path = outdir.join(out_name);

    let title = config.effective_title();
    let title_lines = wrap_lines(&title, config.title_wrap);
    let subtitle_lines = wrap_lines(&config.subtitle, config.subtitle_wrap);
    let metrics = compute_metrics(title_lines.len(), subtitle_lines.len(), COVER_CANVAS)?;

    // Art is normalized into a scoped temp artifact and embedded into the
    // scene; the temp is released as soon as the scene owns the bytes.
    let art_src = find_art(&config.base, &config.slug, config.art.as_deref())?;
    let scene = {
        let normalized = normalize_to_canvas(&art_src, COVER_CANVAS, SharpenOpts::default())?;
        let art = EmbeddedArt::from_path(normalized.path())?;
        compose(
            COVER_CANVAS,
            palette,
            Some(art),
            title_lines,
            subtitle_lines,
            &config.badge,
            metrics,
        )
    };

    let backends = default_backends();
    let image = render_with_fallback(&scene, &backends)?;

    // Encode next to the final name, then rename: a failed encode must not
    // leave a partial cover in place.
    let partial_path = out_path.with_extension("jpg.partial");
    let mut partial_guard = TempFileGuard::new(partial_path.clone());
    write_jpeg(&image, &partial_path, config.jpeg_quality, [0, 0, 0])?;
    std::fs::rename(&partial_path, &out_path)
        .with_context(|| format!("move cover into place '{}'", out_path.display()))?;
    partial_guard.disarm();
    tracing::info!("cover written: {}", out_path.display());

    let tag_outcomes = if config.embed_tracks {
        embed_cover_in_tracks(&outdir, &out_path, &TagOpts::default())?
    } else {
        Vec::new()
    };

    let archive_path = if config.archive {
        delete_source_art(&art_src, &config.base);
        match zip_package_folder(&outdir, &config.slug) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("bundling failed: {e}");
                None
            }
        }
    } else {
        None
    };

    Ok(BuildOutcome {
        cover_path: out_path,
        tag_outcomes,
        archive_path,
    })
}
