use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{CoverError, CoverResult};
use crate::foundation::tempfile::TempFileGuard;

/// Options for embedding the cover into a package's MP3 tracks.
#[derive(Clone, Debug)]
pub struct TagOpts {
    /// Program invoked for each track.
    pub ffmpeg: PathBuf,
}

impl Default for TagOpts {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

/// Result of one track's embed attempt. `Err` is always `TagEmbed`.
#[derive(Debug)]
pub struct TagOutcome {
    pub track: PathBuf,
    pub result: CoverResult<()>,
}

/// Embed `cover` into every MP3 track directly inside `folder`, one track at
/// a time.
///
/// A failed track is reported and skipped; the remaining tracks are still
/// processed. A missing ffmpeg skips embedding entirely with a warning —
/// tagging is an optional last stage, not a reason to fail the build.
pub fn embed_cover_in_tracks(
    folder: &Path,
    cover: &Path,
    opts: &TagOpts,
) -> CoverResult<Vec<TagOutcome>> {
    if !is_ffmpeg_available(&opts.ffmpeg) {
        tracing::warn!(
            "`{}` not found; skipping track tagging",
            opts.ffmpeg.display()
        );
        return Ok(Vec::new());
    }

    let tracks = list_mp3_tracks(folder)?;
    if tracks.is_empty() {
        tracing::info!("no mp3 tracks to tag in {}", folder.display());
        return Ok(Vec::new());
    }

    let mut outcomes = Vec::with_capacity(tracks.len());
    for track in tracks {
        let result = embed_one(&track, cover, opts);
        match &result {
            Ok(()) => tracing::info!("embedded cover into {}", track.display()),
            Err(e) => tracing::warn!("{e}"),
        }
        outcomes.push(TagOutcome { track, result });
    }
    Ok(outcomes)
}

/// MP3 files directly inside `folder`, sorted by name for a stable order.
fn list_mp3_tracks(folder: &Path) -> CoverResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder).map_err(|e| {
        CoverError::tag_embed(format!(
            "failed to list package folder '{}': {e}",
            folder.display()
        ))
    })?;

    let mut tracks: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
        })
        .collect();
    tracks.sort();
    Ok(tracks)
}

/// Tag a single track: write the tagged copy next to the original, then
/// atomically rename it over the original. On any failure the original is
/// left untouched and the partial output is removed.
fn embed_one(track: &Path, cover: &Path, opts: &TagOpts) -> CoverResult<()> {
    let file_name = track
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            CoverError::tag_embed(format!("track has no usable file name: {}", track.display()))
        })?;
    let tmp = track.with_file_name(format!("_tmp_{file_name}"));
    let mut tmp_guard = TempFileGuard::new(tmp.clone());

    let status = Command::new(&opts.ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(track)
        .arg("-i")
        .arg(cover)
        .args([
            "-map",
            "0:a",
            "-map",
            "1:v",
            "-c:a",
            "copy",
            "-c:v",
            "mjpeg",
            "-disposition:v",
            "attached_pic",
        ])
        .arg(&tmp)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| {
            CoverError::tag_embed(format!(
                "failed to spawn ffmpeg for '{}': {e}",
                track.display()
            ))
        })?;
    if !status.success() {
        return Err(CoverError::tag_embed(format!(
            "ffmpeg exited with status {status} for '{}'",
            track.display()
        )));
    }

    std::fs::rename(&tmp, track).map_err(|e| {
        CoverError::tag_embed(format!(
            "failed to replace '{}' with tagged copy: {e}",
            track.display()
        ))
    })?;
    tmp_guard.disarm();
    Ok(())
}

/// Return `true` when ffmpeg can be invoked from `PATH`.
fn is_ffmpeg_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
