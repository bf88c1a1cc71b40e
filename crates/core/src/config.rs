//! Application configuration
//!
//! Settings are loaded from a TOML file; every field has a default so a
//! missing file or empty section still yields a working configuration.
//!
//! ```toml
//! [database]
//! path = "/var/lib/roomboard/roomboard.db"
//!
//! [grid]
//! open_hour = 8
//! close_hour = 20
//! slot_minutes = 30
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::schedule::GridConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub grid: GridConfig,
}

/// Database location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Explicit database file path; falls back to the platform data dir
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults if
    /// the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Platform-conventional location of the config file
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "roomboard")
            .map(|dirs| dirs.config_dir().join("roomboard.toml"))
    }

    /// Resolve the database path: the configured one, or the platform
    /// data dir
    pub fn database_path(&self) -> Option<PathBuf> {
        self.database.path.clone().or_else(|| {
            ProjectDirs::from("", "", "roomboard")
                .map(|dirs| dirs.data_dir().join("roomboard.db"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.grid, GridConfig::default());
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_partial_file_overrides_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomboard.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "[grid]\nopen_hour = 8\nclose_hour = 20\nslot_minutes = 30\n"
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.grid.open_hour, 8);
        assert_eq!(config.grid.close_hour, 20);
        assert_eq!(config.grid.slot_minutes, 30);
        // Untouched section keeps its default
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_missing_grid_field_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomboard.toml");
        std::fs::write(&path, "[grid]\nopen_hour = 9\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.grid.open_hour, 9);
        assert_eq!(config.grid.close_hour, GridConfig::default().close_hour);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roomboard.toml");
        std::fs::write(&path, "[grid\nopen_hour = ").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
