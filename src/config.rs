//! Schema build configuration.
//!
//! Every key is optional. A typical file:
//!
//! ```toml
//! [compile]
//! reject_reserved_field_names = true
//!
//! [logging]
//! default_level = "INFO"
//!
//! [logging.features]
//! access = "WARN"
//! resolve = "DEBUG"
//! ```

use crate::logging::{LogConfig, LogConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Reject field paths `AND`, `OR` and `NOT`.
    ///
    /// When disabled, such a field that declares a where input takes over the
    /// connective's slot in the where type and the where resolver, and that
    /// connective is no longer available on the list.
    pub reject_reserved_field_names: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            reject_reserved_field_names: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub compile: CompileConfig,
    pub logging: LogConfig,
}

impl SchemaConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: SchemaConfig = toml::from_str(contents)?;
        config.logging.apply_env_overrides();
        config.logging.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid logging config: {0}")]
    Logging(#[from] LogConfigError),
}
