use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::models::{Metric, TimeRange, Units};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Measurement source and chart defaults
    pub settings: AppSettings,

    /// Logging setup
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Measurement CSV used when no `--file` is given
    pub data_file: Option<PathBuf>,

    /// Subject whose measurements are shown by default
    pub default_subject: Option<String>,

    /// Window used when no `--range` is given
    pub default_range: TimeRange,

    /// Metric charted when no `--metric` is given
    pub default_metric: Metric,

    /// Units the measurements are recorded in
    pub units: Units,

    /// Most recent records requested from the source
    pub fetch_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            data_file: None,
            default_subject: None,
            default_range: TimeRange::ThreeMonths,
            default_metric: Metric::BodyWeight,
            units: Units::Metric,
            fetch_limit: 100,
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bodyrs")
            .join("config.toml")
    }

    /// Load from `path`, or from the default location when it exists.
    ///
    /// A missing default file yields the built-in defaults; an explicit path
    /// must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    /// Flattened `key = value` listing for `config --list`
    pub fn entries(&self) -> Vec<(String, String)> {
        let settings = &self.settings;
        vec![
            (
                "data_file".to_string(),
                settings
                    .data_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (
                "default_subject".to_string(),
                settings.default_subject.clone().unwrap_or_else(|| "-".to_string()),
            ),
            ("default_range".to_string(), settings.default_range.to_string()),
            ("default_metric".to_string(), settings.default_metric.key().to_string()),
            ("units".to_string(), format!("{:?}", settings.units)),
            ("fetch_limit".to_string(), settings.fetch_limit.to_string()),
            ("log_level".to_string(), self.logging.level.to_filter()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.settings.units, deserialized.settings.units);
        assert_eq!(config.settings.default_range, deserialized.settings.default_range);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original_config = AppConfig::default();
        original_config.settings.default_subject = Some("client-1".to_string());
        original_config.settings.default_range = TimeRange::OneYear;
        original_config.settings.default_metric = Metric::WaistSize;

        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded_config.settings.default_subject.as_deref(), Some("client-1"));
        assert_eq!(loaded_config.settings.default_range, TimeRange::OneYear);
        assert_eq!(loaded_config.settings.default_metric, Metric::WaistSize);
    }

    #[test]
    fn test_handwritten_config() {
        let toml_str = r#"
            [metadata]
            version = "1.0"
            created_at = "2024-01-01T00:00:00Z"
            updated_at = "2024-01-01T00:00:00Z"

            [settings]
            data_file = "measurements.csv"
            default_range = "6m"
            default_metric = "thigh_size"
            units = "Imperial"
            fetch_limit = 50
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.settings.default_range, TimeRange::SixMonths);
        assert_eq!(config.settings.default_metric, Metric::ThighSize);
        assert_eq!(config.settings.units, Units::Imperial);
        assert_eq!(config.settings.fetch_limit, 50);
        assert!(config.settings.default_subject.is_none());
    }

    #[test]
    fn test_load_explicit_path_errors() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("absent.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "[settings\nfetch_limit = ").unwrap();
        let err = AppConfig::load(Some(&broken)).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML configuration"));
    }
}
