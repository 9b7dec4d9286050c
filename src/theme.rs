//! Persisted colour theme preference.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Map a stored value onto the allow-list. Anything unknown or missing is the default.
pub fn resolve_theme(stored: Option<&str>) -> Theme {
    match stored.map(str::trim) {
        Some("dark") => Theme::Dark,
        Some("light") => Theme::Light,
        _ => Theme::default(),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Prefs {
    #[serde(default)]
    theme: Option<String>,
}

/// Default location: `<config_dir>/soccercloud-dashboard/prefs.json`.
pub fn prefs_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("soccercloud-dashboard").join("prefs.json"))
}

/// Never fails: an unreadable or corrupt file reads as the default theme.
pub fn load_theme(path: &Path) -> Theme {
    let stored = std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<Prefs>(&raw).ok())
        .and_then(|p| p.theme);
    resolve_theme(stored.as_deref())
}

pub fn save_theme(path: &Path, theme: Theme) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let prefs = Prefs {
        theme: Some(theme.as_str().to_string()),
    };
    let body = serde_json::to_string_pretty(&prefs)?;
    std::fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_dark() {
        assert_eq!(resolve_theme(Some("light")), Theme::Light);
        assert_eq!(resolve_theme(Some("dark")), Theme::Dark);
        assert_eq!(resolve_theme(Some("solarized")), Theme::Dark);
        assert_eq!(resolve_theme(Some("")), Theme::Dark);
        assert_eq!(resolve_theme(None), Theme::Dark);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        save_theme(&path, Theme::Light).unwrap();
        assert_eq!(load_theme(&path), Theme::Light);
    }

    #[test]
    fn corrupt_or_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        assert_eq!(load_theme(&path), Theme::Dark);

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_theme(&path), Theme::Dark);

        std::fs::write(&path, r#"{"theme":"neon"}"#).unwrap();
        assert_eq!(load_theme(&path), Theme::Dark);
    }
}
