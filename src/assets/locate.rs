use std::path::{Path, PathBuf};

use crate::foundation::error::{CoverError, CoverResult};

const ART_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Find the source art for `slug` under `base`.
///
/// An explicit override (relative to `base`, or absolute) wins; otherwise the
/// base folder is probed for `<slug>_art.<ext>` and then `<slug>.<ext>`.
pub fn find_art(base: &Path, slug: &str, explicit: Option<&Path>) -> CoverResult<PathBuf> {
    if let Some(name) = explicit {
        let cand = if name.is_absolute() {
            name.to_path_buf()
        } else {
            base.join(name)
        };
        if cand.is_file() {
            return Ok(cand);
        }
        return Err(CoverError::art_decode(format!(
            "art not found: {}",
            cand.display()
        )));
    }

    for stem in [format!("{slug}_art"), slug.to_owned()] {
        for ext in ART_EXTENSIONS {
            let cand = base.join(format!("{stem}.{ext}"));
            if cand.is_file() {
                return Ok(cand);
            }
        }
    }

    Err(CoverError::art_decode(format!(
        "no art found in {} for \"{slug}\" (expected \"{slug}_art.(png|jpg|jpeg|webp)\" or \"{slug}.*\")",
        base.display()
    )))
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
    fn prefers_art_suffix_over_bare_slug() {
        let base = temp_base("locate_prefers");
        std::fs::write(base.join("moon.png"), b"x").unwrap();
        std::fs::write(base.join("moon_art.jpg"), b"x").unwrap();

        let found = find_art(&base, "moon", None).unwrap();
        assert_eq!(found.file_name().unwrap(), "moon_art.jpg");
        std::fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn falls_back_to_bare_slug() {
        let base = temp_base("locate_bare");
        std::fs::write(base.join("river.webp"), b"x").unwrap();

        let found = find_art(&base, "river", None).unwrap();
        assert_eq!(found.file_name().unwrap(), "river.webp");
        std::fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn explicit_override_must_exist() {
        let base = temp_base("locate_explicit");
        std::fs::write(base.join("custom.png"), b"x").unwrap();

        let found = find_art(&base, "ignored", Some(Path::new("custom.png"))).unwrap();
        assert_eq!(found.file_name().unwrap(), "custom.png");

        let err = find_art(&base, "ignored", Some(Path::new("missing.png"))).unwrap_err();
        assert!(matches!(err, CoverError::ArtDecode(_)));
        std::fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn missing_art_is_an_art_decode_error() {
        let base = temp_base("locate_missing");
        let err = find_art(&base, "nothing_here", None).unwrap_err();
        assert!(matches!(err, CoverError::ArtDecode(_)));
        std::fs::remove_dir_all(&base).unwrap();
    }
}
