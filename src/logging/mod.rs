//! # Logging
//!
//! The crate logs through the `log` facade. Hosts that do not install their
//! own logger can call [`LoggingSystem::init`] to install `env_logger` with
//! per-feature levels taken from a [`LogConfig`].

pub mod config;
pub mod features;

pub use config::{LogConfig, LogConfigError};
pub use features::LogFeature;

use once_cell::sync::OnceCell;

static LOGGING_INITIALIZED: OnceCell<LogConfig> = OnceCell::new();

pub struct LoggingSystem;

impl LoggingSystem {
    /// Initialize logging with the default configuration
    pub fn init_default() -> Result<(), LoggingError> {
        Self::init(&LogConfig::default())
    }

    /// Install `env_logger` filtered by `config`.
    ///
    /// Concurrent callers wait for the first one; every caller but the one
    /// that installed the logger gets [`LoggingError::AlreadyInitialized`].
    pub fn init(config: &LogConfig) -> Result<(), LoggingError> {
        config.validate()?;

        let mut installed = false;
        LOGGING_INITIALIZED.get_or_try_init(|| -> Result<LogConfig, LoggingError> {
            let mut builder = env_logger::Builder::new();
            builder.filter_level(config::parse_level(&config.default_level)?);
            for (name, level) in &config.features {
                if let Some(feature) = LogFeature::from_name(name) {
                    builder.filter_module(feature.target(), config::parse_level(level)?);
                }
            }
            builder
                .try_init()
                .map_err(|e| LoggingError::Install(e.to_string()))?;
            installed = true;
            Ok(config.clone())
        })?;

        if installed {
            Ok(())
        } else {
            Err(LoggingError::AlreadyInitialized)
        }
    }

    /// The configuration logging was initialized with, if any.
    pub fn config() -> Option<&'static LogConfig> {
        LOGGING_INITIALIZED.get()
    }
}

/// Logging system errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logging system already initialized")]
    AlreadyInitialized,
    #[error("Failed to install logger: {0}")]
    Install(String),
    #[error("Config error: {0}")]
    Config(#[from] LogConfigError),
}
