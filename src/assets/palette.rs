use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{CoverError, CoverResult};

/// The six color roles every cover scene consumes.
///
/// A palette file must provide all six keys with non-empty values; a partial
/// palette is a validation error, never a default-fill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Palette {
    /// Top stop of the background gradient.
    pub background_start: String,
    /// Bottom stop of the background gradient.
    pub background_end: String,
    pub title_color: String,
    pub subtitle_color: String,
    pub badge_background: String,
    pub badge_text_color: String,
}

impl Palette {
    pub fn warm() -> Self {
        Self {
            background_start: "#1d2540".to_owned(),
            background_end: "#0c1326".to_owned(),
            title_color: "#F5F1E8".to_owned(),
            subtitle_color: "#E7DFCF".to_owned(),
            badge_background: "#2A3358".to_owned(),
            badge_text_color: "#F5F1E8".to_owned(),
        }
    }

    pub fn cool() -> Self {
        Self {
            background_start: "#10222b".to_owned(),
            background_end: "#0a1720".to_owned(),
            title_color: "#EAF6FF".to_owned(),
            subtitle_color: "#D3EAF8".to_owned(),
            badge_background: "#1c2f3a".to_owned(),
            badge_text_color: "#EAF6FF".to_owned(),
        }
    }

    pub fn forest() -> Self {
        Self {
            background_start: "#142117".to_owned(),
            background_end: "#0b140d".to_owned(),
            title_color: "#F2F6EA".to_owned(),
            subtitle_color: "#E6EDD9".to_owned(),
            badge_background: "#1c2b1f".to_owned(),
            badge_text_color: "#F2F6EA".to_owned(),
        }
    }

    /// Look up a built-in palette by case-insensitive name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "warm" => Some(Self::warm()),
            "cool" => Some(Self::cool()),
            "forest" => Some(Self::forest()),
            _ => None,
        }
    }

    /// Resolve a palette selector: a built-in name, or a path to a palette
    /// JSON file.
    pub fn load(selector: &str) -> CoverResult<Self> {
        if let Some(palette) = Self::builtin(selector) {
            return Ok(palette);
        }
        let path = Path::new(selector);
        if path.exists() {
            return Self::from_path(path);
        }
        Err(CoverError::palette_validation(format!(
            "unknown palette \"{selector}\" (expected warm|cool|forest or a palette JSON path)"
        )))
    }

    /// Load and validate a palette JSON file.
    pub fn from_path(path: &Path) -> CoverResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            CoverError::palette_validation(format!(
                "failed to read palette file '{}': {e}",
                path.display()
            ))
        })?;
        let palette: Palette = serde_json::from_slice(&bytes).map_err(|e| {
            CoverError::palette_validation(format!("palette file '{}': {e}", path.display()))
        })?;
        palette.validate()?;
        Ok(palette)
    }

    /// Check that every role carries a non-empty value.
    pub fn validate(&self) -> CoverResult<()> {
        for (role, value) in self.roles() {
            if value.trim().is_empty() {
                return Err(CoverError::palette_validation(format!(
                    "palette role \"{role}\" must be non-empty"
                )));
            }
        }
        Ok(())
    }

    fn roles(&self) -> [(&'static str, &str); 6] {
        [
            ("background-start", &self.background_start),
            ("background-end", &self.background_end),
            ("title-color", &self.title_color),
            ("subtitle-color", &self.subtitle_color),
            ("badge-background", &self.badge_background),
            ("badge-text-color", &self.badge_text_color),
        ]
    }
}
