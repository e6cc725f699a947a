//! Persisted preferences.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zenwatch_api::types::ArticleFilters;

use crate::error::Result;
use crate::state::{ThemeMode, ViewMode};

/// Application settings that persist across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Color scheme.
    pub theme: ThemeMode,
    /// Feed layout.
    pub view_mode: ViewMode,
    /// Filters applied when the feed opens.
    pub default_filters: ArticleFilters,
    /// Access token from the last session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::System,
            view_mode: ViewMode::Grid,
            default_filters: ArticleFilters::default(),
            session_token: None,
        }
    }
}

impl AppSettings {
    /// `<config dir>/zenwatch/settings.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zenwatch")
            .join("settings.json")
    }

    /// Loads settings, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            debug!(?path, "No settings file, using defaults");
            return Ok(Self::default());
        }
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes settings, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        info!("Settings saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load(&dir.path().join("settings.json")).await.unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            theme: ThemeMode::Dark,
            view_mode: ViewMode::Compact,
            default_filters: ArticleFilters {
                category: Some("ai".into()),
                ..ArticleFilters::default()
            },
            session_token: Some("tok".into()),
        };

        settings.save(&path).await.unwrap();
        assert_eq!(AppSettings::load(&path).await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, r#"{"theme":"light"}"#).await.unwrap();

        let settings = AppSettings::load(&path).await.unwrap();
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.view_mode, ViewMode::Grid);
        assert!(settings.session_token.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "not json").await.unwrap();
        assert!(AppSettings::load(&path).await.is_err());
    }
}
