use std::path::PathBuf;

use crate::foundation::error::{CoverError, CoverResult};
use crate::layout::wrap::WrapOpts;

/// Explicit configuration for one cover build.
///
/// Populated once at startup and threaded through every stage. Pipeline code
/// never consults the process environment or any other ambient state.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Base storage directory; package folders live directly under it.
    pub base: PathBuf,
    /// Package identifier: folder name and art filename base.
    pub slug: String,
    /// Cover title; empty means "derive from the slug".
    pub title: String,
    /// Optional subtitle; empty means "no subtitle element".
    pub subtitle: String,
    /// Optional badge label; empty means "no badge element".
    pub badge: String,
    /// Palette selector: a built-in name or a palette JSON path.
    pub palette: String,
    /// Explicit art file (relative to `base`, or absolute) instead of
    /// slug-based discovery.
    pub art: Option<PathBuf>,
    /// Output filename override; defaults to `<slug>_cover.jpg`.
    pub out_name: Option<String>,
    /// Wrap settings for the title block.
    pub title_wrap: WrapOpts,
    /// Wrap settings for the subtitle block.
    pub subtitle_wrap: WrapOpts,
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    /// Embed the finished cover into the package's MP3 tracks.
    pub embed_tracks: bool,
    /// Archive-and-cleanup mode: delete the consumed source art and zip the
    /// package folder. Off means render-only.
    pub archive: bool,
}

impl BuildConfig {
    /// Minimal config for `slug` under `base`: warm palette, default wrap
    /// settings, embedding on, archive off.
    pub fn new(base: impl Into<PathBuf>, slug: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            slug: slug.into(),
            title: String::new(),
            subtitle: String::new(),
            badge: String::new(),
            palette: "warm".to_owned(),
            art: None,
            out_name: None,
            title_wrap: WrapOpts::title_default(),
            subtitle_wrap: WrapOpts::subtitle_default(),
            jpeg_quality: 92,
            embed_tracks: true,
            archive: false,
        }
    }

    /// Title to render: the configured title, or the humanized slug when the
    /// configured title is empty.
    pub fn effective_title(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            humanize_slug(&self.slug)
        } else {
            title.to_owned()
        }
    }

    pub fn validate(&self) -> CoverResult<()> {
        if self.slug.trim().is_empty() {
            return Err(CoverError::validation("slug must be non-empty"));
        }
        if self.slug.contains(['/', '\\']) {
            return Err(CoverError::validation(
                "slug must not contain path separators",
            ));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(CoverError::validation("jpeg_quality must be 1-100"));
        }
        self.title_wrap.validate()?;
        self.subtitle_wrap.validate()?;
        Ok(())
    }
}

/// Turn a slug like `friendly_dinosaurs` into `Friendly Dinosaurs`.
pub fn humanize_slug(slug: &str) -> String {
    slug.replace(['_', '-'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanize_slug_title_cases_words() {
        assert_eq!(humanize_slug("friendly_dinosaurs"), "Friendly Dinosaurs");
        assert_eq!(humanize_slug("sleepy-town-tales"), "Sleepy Town Tales");
        assert_eq!(humanize_slug("  moon  "), "Moon");
    }

    #[test]
    fn effective_title_falls_back_to_slug() {
        let mut cfg = BuildConfig::new("/tmp", "quiet_forest");
        assert_eq!(cfg.effective_title(), "Quiet Forest");
        cfg.title = "The Quiet Forest".to_owned();
        assert_eq!(cfg.effective_title(), "The Quiet Forest");
    }

    #[test]
    fn validate_rejects_bad_inputs() {
        let mut cfg = BuildConfig::new("/tmp", "");
        assert!(cfg.validate().is_err());

        cfg.slug = "a/b".to_owned();
        assert!(cfg.validate().is_err());

        cfg.slug = "ok".to_owned();
        cfg.jpeg_quality = 0;
        assert!(cfg.validate().is_err());

        cfg.jpeg_quality = 92;
        cfg.validate().unwrap();
    }
}
