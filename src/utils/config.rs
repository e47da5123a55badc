use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::{HOME_LABEL, MAP_FILE_EXTENSION, MILLIMETERS_PER_METER};
use crate::tools::devices::DEFAULT_HDOP_WARNING;

/// Map tools configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Map loaded at startup
    pub map_file: Option<PathBuf>,
    /// Directory new maps are created in (working directory if unset)
    pub map_directory: Option<PathBuf>,
    /// Extension appended to new map names
    pub map_extension: String,
    /// Name given to home markers
    pub home_label: String,
    /// Map units per meter of ground distance
    pub units_per_meter: f64,
    /// Register the obstacle line commands
    pub enable_obstacle_commands: bool,
    /// HDOP above which fixes are logged as imprecise
    pub hdop_warning_threshold: f64,
    /// Default tracing filter directive
    pub log_filter: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            map_file: None,
            map_directory: None,
            map_extension: MAP_FILE_EXTENSION.to_string(),
            home_label: HOME_LABEL.to_string(),
            units_per_meter: MILLIMETERS_PER_METER,
            enable_obstacle_commands: false,
            hdop_warning_threshold: DEFAULT_HDOP_WARNING,
            log_filter: "gps_map_tools=info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("Invalid parameter '{parameter}' = '{value}': {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    #[error("I/O error: {message}")]
    IoError { message: String },
    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl ToolsConfig {
    /// Load and validate configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: ToolsConfig = serde_json::from_str(&content).map_err(|e| {
            ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.units_per_meter.is_finite() || self.units_per_meter <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "units_per_meter".to_string(),
                value: self.units_per_meter.to_string(),
                reason: "must be a positive number".to_string(),
            });
        }

        if !self.map_extension.starts_with('.') || self.map_extension.len() < 2 {
            return Err(ConfigError::InvalidParameter {
                parameter: "map_extension".to_string(),
                value: self.map_extension.clone(),
                reason: "must be a dot followed by an extension".to_string(),
            });
        }

        if self.home_label.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "home_label".to_string(),
                value: self.home_label.clone(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.hdop_warning_threshold.is_nan() || self.hdop_warning_threshold < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "hdop_warning_threshold".to_string(),
                value: self.hdop_warning_threshold.to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ToolsConfig::default();
        assert_eq!(config.map_extension, ".map");
        assert_eq!(config.units_per_meter, 1000.0);
        assert!(!config.enable_obstacle_commands);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.json");

        let config = ToolsConfig {
            map_file: Some(PathBuf::from("yard.map")),
            enable_obstacle_commands: true,
            ..ToolsConfig::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = ToolsConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(&path, r#"{ "units_per_meter": 1.0 }"#).unwrap();

        let loaded = ToolsConfig::from_file(&path).unwrap();
        assert_eq!(loaded.units_per_meter, 1.0);
        assert_eq!(loaded.map_extension, ".map");
    }

    #[test]
    fn test_invalid_units_rejected() {
        let config = ToolsConfig {
            units_per_meter: 0.0,
            ..ToolsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { parameter, .. }) if parameter == "units_per_meter"
        ));
    }

    #[test]
    fn test_invalid_extension_rejected() {
        let config = ToolsConfig {
            map_extension: "map".to_string(),
            ..ToolsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = ToolsConfig::from_file("does/not/exist.json");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
