//! Note-service settings.
//!
//! Settings are read from a TOML file, by default
//! `~/.config/clipdown/settings.toml`; the CLI layers environment variables
//! and flags on top. Values are passed explicitly to whatever needs them.
//!
//! ```toml
//! port = "41184"
//! token = "0123abcd..."
//! notebook_id = "Clips"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClipError, Result};

/// Default note-service port.
pub const DEFAULT_PORT: &str = "41184";

/// Default target notebook.
pub const DEFAULT_NOTEBOOK: &str = "Clips";

/// Connection settings for the note service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Port of the local note service.
    pub port: String,
    /// API token; empty means not configured.
    pub token: String,
    /// Notebook that receives new notes.
    pub notebook_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            token: String::new(),
            notebook_id: DEFAULT_NOTEBOOK.to_string(),
        }
    }
}

/// Values that replace file settings when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// Port override.
    pub port: Option<String>,
    /// Token override.
    pub token: Option<String>,
    /// Notebook override.
    pub notebook_id: Option<String>,
}

impl Settings {
    /// Default settings file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clipdown").join("settings.toml"))
    }

    /// Load settings from `path`, or from [`Settings::default_path`].
    ///
    /// A missing file gives the defaults.
    ///
    /// # Errors
    ///
    /// [`ClipError::Settings`] when the file exists but cannot be read or is
    /// not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ClipError::Settings(format!("failed to read {}: {err}", path.display())));
            }
        };

        let settings: Self = toml::from_str(&content)
            .map_err(|err| ClipError::Settings(format!("failed to parse {}: {err}", path.display())))?;
        tracing::debug!(
            path = %path.display(),
            port = %settings.port,
            notebook = %settings.notebook_id,
            has_token = !settings.token.is_empty(),
            "loaded settings"
        );
        Ok(settings)
    }

    /// Write settings as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// [`ClipError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|err| ClipError::Settings(format!("failed to encode: {err}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides; present values win.
    #[must_use]
    pub fn override_with(self, overrides: SettingsOverrides) -> Self {
        Self {
            port: overrides.port.unwrap_or(self.port),
            token: overrides.token.unwrap_or(self.token),
            notebook_id: overrides.notebook_id.unwrap_or(self.notebook_id),
        }
    }

    /// Base URL of the note service.
    pub fn base_url(&self) -> String {
        format!("http://localhost:{}", self.port.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.port, "41184");
        assert_eq!(settings.token, "");
        assert_eq!(settings.notebook_id, "Clips");
        assert_eq!(settings.base_url(), "http://localhost:41184");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "token = \"abc\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.token, "abc");
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.notebook_id, DEFAULT_NOTEBOOK);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "not valid [[[").unwrap();

        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ClipError::Settings(_)));
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let settings = Settings {
            port: "27583".to_string(),
            token: "secret".to_string(),
            notebook_id: "abc123".to_string(),
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(Some(&path)).unwrap(), settings);
    }

    #[test]
    fn overrides_win_where_present() {
        let base = Settings {
            token: "file".to_string(),
            ..Settings::default()
        };
        let merged = base.override_with(SettingsOverrides {
            port: Some("1234".to_string()),
            token: None,
            notebook_id: Some("Inbox".to_string()),
        });
        assert_eq!(merged.port, "1234");
        assert_eq!(merged.token, "file");
        assert_eq!(merged.notebook_id, "Inbox");
    }
}
