//! Configuration for the logging system

use super::features::LogFeature;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Environment variable overriding the default log level.
pub const LOG_LEVEL_ENV: &str = "LIST_SCHEMA_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default log level for all targets
    pub default_level: String,
    /// Feature-specific log levels, keyed by feature name
    pub features: HashMap<String, String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "INFO".to_string(),
            features: Self::default_features(),
        }
    }
}

impl LogConfig {
    fn default_features() -> HashMap<String, String> {
        let mut features = HashMap::new();
        features.insert(LogFeature::Schema.name().to_string(), "INFO".to_string());
        features.insert(LogFeature::Access.name().to_string(), "WARN".to_string());
        features
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            self.default_level = level;
        }
    }

    /// Check that every level parses and every feature exists.
    pub fn validate(&self) -> Result<(), LogConfigError> {
        parse_level(&self.default_level)?;
        for (feature, level) in &self.features {
            if LogFeature::from_name(feature).is_none() {
                return Err(LogConfigError::UnknownFeature(feature.clone()));
            }
            parse_level(level)?;
        }
        Ok(())
    }
}

/// Parse a level name such as `DEBUG` (case-insensitive).
pub fn parse_level(level: &str) -> Result<LevelFilter, LogConfigError> {
    match level.to_ascii_uppercase().as_str() {
        "OFF" => Ok(LevelFilter::Off),
        "TRACE" => Ok(LevelFilter::Trace),
        "DEBUG" => Ok(LevelFilter::Debug),
        "INFO" => Ok(LevelFilter::Info),
        "WARN" => Ok(LevelFilter::Warn),
        "ERROR" => Ok(LevelFilter::Error),
        _ => Err(LogConfigError::InvalidLevel(level.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogConfigError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    #[error("Unknown logging feature: {0}")]
    UnknownFeature(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(LogConfig::default().validate().is_ok());
    }

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_level("debug"), Ok(LevelFilter::Debug));
        assert_eq!(
            parse_level("loud"),
            Err(LogConfigError::InvalidLevel("loud".to_string()))
        );
    }

    #[test]
    fn unknown_feature_is_rejected() {
        let mut config = LogConfig::default();
        config
            .features
            .insert("network".to_string(), "DEBUG".to_string());
        assert_eq!(
            config.validate(),
            Err(LogConfigError::UnknownFeature("network".to_string()))
        );
    }
}
