//! Configuration Module
//! TOML settings for the data source, query sizes, window and PNG export.

use crate::stats::DEFAULT_TOP_N;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const APP_NAME: &str = "air-crash-dashboard";

/// CSV shipped alongside the dashboard.
pub const DEFAULT_DATA_PATH: &str = "Air Crash Full Data Updated_2024.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
        }
    }
}

/// Pixel size of exported chart images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 700,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Groups kept by the top-N charts.
    pub top_n: usize,
    /// Rows shown in the table preview.
    pub preview_rows: usize,
    pub window: WindowConfig,
    pub export: ExportConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: DEFAULT_TOP_N,
            preview_rows: 5,
            window: WindowConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// `<config dir>/air-crash-dashboard/config.toml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
    }

    /// Load an explicit config file, else the default one if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    fn sanitized(mut self) -> Self {
        if self.top_n == 0 {
            warn!("top_n must be at least 1, using {}", DEFAULT_TOP_N);
            self.top_n = DEFAULT_TOP_N;
        }
        if self.export.width == 0 || self.export.height == 0 {
            warn!("export size must be non-zero, using defaults");
            self.export = ExportConfig::default();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            top_n = 3
            [export]
            width = 640
            "#,
        )
        .unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.export.width, 640);
        assert_eq!(config.export.height, ExportConfig::default().height);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn zero_top_n_falls_back_to_default() {
        let config = DashboardConfig::from_toml_str("top_n = 0").unwrap();
        assert_eq!(config.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(DashboardConfig::from_toml_str("top_n = \"five\"").is_err());
    }
}
