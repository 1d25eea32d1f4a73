//! Dashboard configuration
//!
//! Read from `hr_dashboard.json` in the working directory, or from the file named
//! by `HR_DASHBOARD_CONFIG`. Every field has a built-in default, so a missing file
//! or a partial file is fine. `HR_DASHBOARD_CSV` overrides the CSV path.

use crate::data::{FilterDimension, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "HR_DASHBOARD_CONFIG";
pub const CSV_ENV: &str = "HR_DASHBOARD_CSV";
pub const DEFAULT_CONFIG_FILE: &str = "hr_dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV loaded at startup.
    pub csv_path: Option<PathBuf>,
    /// Rows per page in the Employees tab.
    pub page_size: usize,
    /// Length of the trailing attrition window.
    pub attrition_window_months: u32,
    pub default_filter: FilterDimension,
    pub export_width: u32,
    pub export_height: u32,
    /// Image shown in the banner; skipped when the file is absent.
    pub logo_path: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_path: Some(PathBuf::from("data/HRDataset_v9.csv")),
            page_size: DEFAULT_PAGE_SIZE,
            attrition_window_months: 1,
            default_filter: FilterDimension::Department,
            export_width: 1200,
            export_height: 800,
            logo_path: Some(PathBuf::from("assets/logo.png")),
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Config file location: `HR_DASHBOARD_CONFIG` or `./hr_dashboard.json`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load and validate. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        if let Some(csv) = std::env::var_os(CSV_ENV) {
            config.csv_path = Some(PathBuf::from(csv));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if self.attrition_window_months == 0 {
            return Err(ConfigError::Invalid(
                "attrition_window_months must be at least 1".into(),
            ));
        }
        if self.export_width < 200 || self.export_height < 150 {
            return Err(ConfigError::Invalid(
                "export size must be at least 200x150".into(),
            ));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.attrition_window_months, 1);
        assert_eq!(config.default_filter, FilterDimension::Department);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{ "page_size": 25, "default_filter": "Location" }"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.default_filter, FilterDimension::Location);
        assert_eq!(config.export_width, 1200);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{ "page_size": 0 }"#).unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, "{ page_size: ").unwrap();

        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let config = DashboardConfig {
            csv_path: Some(PathBuf::from("/tmp/hr.csv")),
            attrition_window_months: 3,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = DashboardConfig::load(&path).unwrap();
        assert_eq!(loaded.attrition_window_months, 3);
    }
}
