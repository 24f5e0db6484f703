//! Configuration handling for the TUI

use crate::export::DEFAULT_FILE_PREFIX;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOG_FILE: &str = "reimbursement-tui.log";

/// User configuration, every field optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    /// Directory the generated documents are written to
    pub output_dir: Option<PathBuf>,
    /// File name prefix, before the submission date
    pub file_prefix: Option<String>,
    /// Overrides the document title
    pub document_title: Option<String>,
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "spi", "reimbursement-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where the log file goes; None when no home directory can be found
    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join(LOG_FILE))
    }

    /// Load configuration from the user's config directory. The first run
    /// writes the defaults there so the file can be edited.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save() {
                tracing::warn!(error = %e, path = %path.display(), "could not write default config");
            }
            return Ok(config);
        }
        Self::load_from(&path)
    }

    /// Load configuration from `path`, defaults when the file is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the user's config directory
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn file_prefix(&self) -> &str {
        self.file_prefix.as_deref().unwrap_or(DEFAULT_FILE_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.output_dir.is_none());
        assert!(config.file_prefix.is_none());
        assert!(config.document_title.is_none());
        assert_eq!(config.output_dir(), PathBuf::from("."));
        assert_eq!(config.file_prefix(), "SPI_Reimbursement_Request");
    }

    #[test]
    fn test_serialization() {
        let config = AppConfig {
            output_dir: Some(PathBuf::from("/tmp/claims")),
            file_prefix: Some("Claim".to_string()),
            document_title: Some("Travel Reimbursement".to_string()),
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
        assert_eq!(parsed.file_prefix(), "Claim");
        assert_eq!(parsed.output_dir(), PathBuf::from("/tmp/claims"));
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        let json = r#"{"file_prefix": "Claim", "unknown_field": "value"}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.file_prefix, Some("Claim".to_string()));
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"document_title": "Expenses"}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.document_title.as_deref(), Some("Expenses"));
        assert_eq!(config.file_prefix(), DEFAULT_FILE_PREFIX);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            output_dir: Some(PathBuf::from("/tmp/claims")),
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("\n"));
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_log_path_is_under_data_dir() {
        if let Some(path) = AppConfig::log_path() {
            assert!(path.ends_with(LOG_FILE));
        }
    }
}
