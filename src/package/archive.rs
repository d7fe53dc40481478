use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::CoverResult;
use crate::foundation::tempfile::TempFileGuard;

/// Delete the consumed source art, but only when it lives under `base`.
///
/// Returns `true` when the file was removed. Failures are logged, never
/// escalated: cleanup must not fail a build whose cover already exists.
pub fn delete_source_art(art: &Path, base: &Path) -> bool {
    if !art.is_file() {
        tracing::debug!("source art already gone: {}", art.display());
        return false;
    }
    if !is_within(art, base) {
        tracing::info!("skipped deleting art outside base: {}", art.display());
        return false;
    }
    match std::fs::remove_file(art) {
        Ok(()) => {
            tracing::info!("deleted source art: {}", art.display());
            true
        }
        Err(e) => {
            tracing::warn!("could not delete art '{}': {e}", art.display());
            false
        }
    }
}

fn is_within(child: &Path, parent: &Path) -> bool {
    let (Ok(child), Ok(parent)) = (child.canonicalize(), parent.canonicalize()) else {
        return false;
    };
    child.starts_with(&parent) && child != parent
}

/// Zip the contents of the package `folder` into `<slug>.zip` inside it.
///
/// The archive is written to a `.partial` sibling first and renamed into
/// place, so a crashed run never leaves a half-written zip under the final
/// name. The zip itself (and any stale partial) is excluded from the walk.
pub fn zip_package_folder(folder: &Path, slug: &str) -> CoverResult<PathBuf> {
    let dest_name = format!("{slug}.zip");
    let partial_name = format!("{slug}.zip.partial");
    let dest = folder.join(&dest_name);
    let partial = folder.join(&partial_name);

    let mut partial_guard = TempFileGuard::new(partial.clone());
    let file = std::fs::File::create(&partial)
        .with_context(|| format!("create archive '{}'", partial.display()))?;
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    add_dir_entries(
        &mut writer,
        folder,
        "",
        &[dest_name.as_str(), partial_name.as_str()],
        options,
    )?;

    writer
        .finish()
        .with_context(|| format!("finalize archive '{}'", partial.display()))?;

    std::fs::rename(&partial, &dest)
        .with_context(|| format!("move archive into place '{}'", dest.display()))?;
    partial_guard.disarm();

    tracing::info!("created bundle: {}", dest.display());
    Ok(dest)
}

fn add_dir_entries(
    writer: &mut zip::ZipWriter<std::fs::File>,
    dir: &Path,
    prefix: &str,
    skip_top_level: &[&str],
    options: zip::write::SimpleFileOptions,
) -> CoverResult<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("list folder '{}'", dir.display()))?
        .flatten()
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            tracing::debug!("skipping non-utf8 entry: {}", path.display());
            continue;
        };
        if prefix.is_empty() && skip_top_level.contains(&name) {
            continue;
        }
        let rel = if prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{prefix}/{name}")
        };

        if path.is_dir() {
            add_dir_entries(writer, &path, &rel, skip_top_level, options)?;
        } else {
            writer
                .start_file(rel.as_str(), options)
                .with_context(|| format!("add '{rel}' to archive"))?;
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read '{}' for archive", path.display()))?;
            writer
                .write_all(&bytes)
                .with_context(|| format!("write '{rel}' into archive"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_base(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("storycover_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn zip_contains_the_folder_contents_but_not_itself() {
        let folder = temp_base("archive_roundtrip");
        std::fs::write(folder.join("track_01.mp3"), b"audio one").unwrap();
        std::fs::write(folder.join("cover.jpg"), b"jpeg").unwrap();
        std::fs::create_dir_all(folder.join("extras")).unwrap();
        std::fs::write(folder.join("extras/notes.txt"), b"notes").unwrap();

        let dest = zip_package_folder(&folder, "bundle").unwrap();
        assert_eq!(dest, folder.join("bundle.zip"));
        assert!(!folder.join("bundle.zip.partial").exists());

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&dest).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_owned())
            .collect();
        assert!(names.contains(&"track_01.mp3".to_owned()));
        assert!(names.contains(&"cover.jpg".to_owned()));
        assert!(names.contains(&"extras/notes.txt".to_owned()));
        assert!(!names.iter().any(|n| n.ends_with(".zip")));

        std::fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn rezipping_replaces_the_previous_archive() {
        let folder = temp_base("archive_replace");
        std::fs::write(folder.join("a.txt"), b"a").unwrap();

        zip_package_folder(&folder, "bundle").unwrap();
        std::fs::write(folder.join("b.txt"), b"b").unwrap();
        let dest = zip_package_folder(&folder, "bundle").unwrap();

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&dest).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_owned())
            .collect();
        assert!(names.contains(&"b.txt".to_owned()));
        // The older bundle must not have been swallowed into the new one.
        assert!(!names.iter().any(|n| n.ends_with(".zip")));

        std::fs::remove_dir_all(&folder).unwrap();
    }

    #[test]
    fn source_art_outside_base_is_left_alone() {
        let base = temp_base("archive_delete_base");
        let outside = temp_base("archive_delete_outside");
        let inside_art = base.join("slug_art.png");
        let outside_art = outside.join("slug_art.png");
        std::fs::write(&inside_art, b"x").unwrap();
        std::fs::write(&outside_art, b"x").unwrap();

        assert!(!delete_source_art(&outside_art, &base));
        assert!(outside_art.exists());

        assert!(delete_source_art(&inside_art, &base));
        assert!(!inside_art.exists());

        std::fs::remove_dir_all(&base).unwrap();
        std::fs::remove_dir_all(&outside).unwrap();
    }
}
