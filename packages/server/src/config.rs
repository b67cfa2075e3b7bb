//! Server and CLI configuration.
//!
//! Connection settings come from environment variables; tuning knobs
//! come from an optional TOML file named by `WSO_ATLAS_CONFIG`. Every
//! TOML field has a default, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use wso_atlas_analytics_models::ActivityWindow;
use wso_atlas_database::PaginationConfig;

/// Environment variable naming the optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "WSO_ATLAS_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`AtlasConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid config: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// `[activity]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Trailing window for club activity, in months (12 or 24).
    pub window_months: u32,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self { window_months: 12 }
    }
}

/// Tuning knobs shared by the server and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Bounds for paginated result reads.
    pub pagination: PaginationConfig,
    /// Activity window.
    pub activity: ActivityConfig,
}

impl AtlasConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// See [`AtlasConfig::parse`]; also fails if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Self::parse(&text)
    }

    /// Loads the file named by `WSO_ATLAS_CONFIG`, or the defaults when
    /// the variable is unset.
    ///
    /// # Errors
    ///
    /// See [`AtlasConfig::load`].
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    /// The configured activity window.
    ///
    /// Falls back to 12 months for an unsupported length; [`parse`]
    /// rejects those, so this only matters for hand-built configs.
    ///
    /// [`parse`]: AtlasConfig::parse
    #[must_use]
    pub fn activity_window(&self) -> ActivityWindow {
        ActivityWindow::from_months(self.activity.window_months).unwrap_or(ActivityWindow::Months12)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if ActivityWindow::from_months(self.activity.window_months).is_none() {
            return Err(ConfigError::Invalid {
                message: format!(
                    "activity.window_months must be 12 or 24, got {}",
                    self.activity.window_months
                ),
            });
        }
        if self.pagination.batch_size == 0 {
            return Err(ConfigError::Invalid {
                message: "pagination.batch_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AtlasConfig::parse("").unwrap();
        assert_eq!(config, AtlasConfig::default());
        assert_eq!(config.pagination.batch_size, 1_000);
        assert_eq!(config.pagination.max_pages, 200);
        assert_eq!(config.activity_window(), ActivityWindow::Months12);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = AtlasConfig::parse(
            "[pagination]\nmax_pages = 5\n\n[activity]\nwindow_months = 24\n",
        )
        .unwrap();
        assert_eq!(config.pagination.max_pages, 5);
        assert_eq!(config.pagination.batch_size, 1_000);
        assert_eq!(config.activity_window(), ActivityWindow::Months24);
    }

    #[test]
    fn rejects_unsupported_window() {
        let err = AtlasConfig::parse("[activity]\nwindow_months = 6\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
    }

    #[test]
    fn rejects_zero_batch_size() {
        assert!(AtlasConfig::parse("[pagination]\nbatch_size = 0\n").is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            AtlasConfig::parse("[pagination\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
