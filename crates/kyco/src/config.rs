//! Configuration management for the Kyco controller.
//!
//! This module handles loading and validation of the controller configuration
//! from TOML files. Command-line overrides are applied by the application.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

fn default_shutdown_timeout() -> u64 {
    10
}

fn default_heartbeat_interval() -> u64 {
    1000
}

/// Controller configuration loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Controller settings
    pub controller: ControllerSettings,
    /// Logging configuration settings
    pub logging: LoggingSettings,
}

/// Controller-wide settings.
///
/// Controls how long hosted Apps get to terminate and how often the demo
/// heartbeat App pings its peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerSettings {
    /// Name of this controller instance, used in logs
    pub name: String,
    /// Seconds each App gets to reach `Terminated` after the shutdown event
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
    /// Interval between two heartbeat pings, in milliseconds
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_ms: u64,
}

impl ControllerSettings {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            controller: ControllerSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            name: "kyco".to_string(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            heartbeat_interval_ms: default_heartbeat_interval(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file, creating a default one if it
    /// doesn't exist.
    pub async fn load_from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration for consistency and correctness.
    ///
    /// Returns `Ok(())` if the configuration is valid, or an error string
    /// describing the issue.
    pub fn validate(&self) -> Result<(), String> {
        if self.controller.name.trim().is_empty() {
            return Err("Controller name cannot be empty".to_string());
        }

        if self.controller.shutdown_timeout_secs == 0 {
            return Err("controller.shutdown_timeout_secs must be greater than 0".to_string());
        }

        if self.controller.heartbeat_interval_ms == 0 {
            return Err("controller.heartbeat_interval_ms must be greater than 0".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};
    use tokio::fs;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.controller.name, "kyco");
        assert_eq!(config.controller.shutdown_timeout_secs, 10);
        assert_eq!(config.controller.heartbeat_interval_ms, 1000);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kyco.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config, AppConfig::default());

        // The default file is written and loads back identically
        assert!(path.exists());
        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded, config);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[controller]
name = "of-lab"
shutdown_timeout_secs = 3
heartbeat_interval_ms = 250

[logging]
level = "debug"
json_format = true
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(&temp_file.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(config.controller.name, "of-lab");
        assert_eq!(config.controller.shutdown_timeout(), Duration::from_secs(3));
        assert_eq!(config.controller.heartbeat_interval(), Duration::from_millis(250));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_serde_deserialization_with_defaults() {
        let toml_content = r#"
[controller]
name = "minimal"

[logging]
level = "warn"
"#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.controller.shutdown_timeout_secs, 10);
        assert_eq!(config.controller.heartbeat_interval_ms, 1000);
        assert!(!config.logging.json_format);
    }

    #[tokio::test]
    async fn test_load_from_malformed_file() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[controller\nname = ").await.unwrap();

        assert!(AppConfig::load_from_file(&temp_file.path().to_path_buf())
            .await
            .is_err());
    }

    #[test]
    fn test_validation_empty_name() {
        let mut config = AppConfig::default();
        config.controller.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_durations() {
        let mut config = AppConfig::default();
        config.controller.shutdown_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.controller.heartbeat_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_log_levels() {
        let mut config = AppConfig::default();
        for level in ["trace", "debug", "info", "warn", "error"] {
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "level {level} should be valid");
        }

        config.logging.level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log level: verbose"));
    }
}
