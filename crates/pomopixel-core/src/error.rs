//! Core error types for pomopixel-core.
//!
//! Intent handling never fails (see [`crate::intent::Outcome`]); these errors
//! cover the ambient parts: configuration files and the async driver.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomopixel-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The session driver task has shut down
    #[error("Session driver is no longer running")]
    DriverClosed,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No home directory to place the configuration under
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    /// Dot-path key that names no config value
    #[error("unknown key: {0}")]
    UnknownKey(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
