//! TOML-based application configuration.
//!
//! Stores startup preferences:
//! - Poll resolution and auto-continue delay
//! - Whether sessions advance automatically
//! - Alert cue and mute state
//! - Log filter
//!
//! Configuration lives at `~/.config/pomopixel/config.toml`. It is read at
//! startup only; session state itself is never written back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::cue::AlertCue;
use crate::error::ConfigError;
use crate::session::AUTO_CONTINUE_DELAY;
use crate::timer::POLL_INTERVAL;

/// Timer behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_auto_continue_delay_ms")]
    pub auto_continue_delay_ms: u64,
    #[serde(default = "default_true")]
    pub automatic_sequence: bool,
}

/// Alert cue preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default)]
    pub cue: AlertCue,
    #[serde(default)]
    pub muted: bool,
}

/// Logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomopixel/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

// Default functions
fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL.as_millis() as u64
}
fn default_auto_continue_delay_ms() -> u64 {
    AUTO_CONTINUE_DELAY.as_millis() as u64
}
fn default_true() -> bool {
    true
}
fn default_log_filter() -> String {
    "info".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            auto_continue_delay_ms: default_auto_continue_delay_ms(),
            automatic_sequence: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from `path`, or return defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Write to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] if `key` names no value.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let json = serde_json::to_value(self).map_err(|_| unknown())?;
        match Self::get_json_value_by_path(&json, key).ok_or_else(unknown)? {
            serde_json::Value::String(s) => Ok(s.clone()),
            other => Ok(other.to_string()),
        }
    }

    /// Poll interval, never below 10 ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timer.poll_interval_ms.max(10))
    }

    pub fn auto_continue_delay(&self) -> Duration {
        Duration::from_millis(self.timer.auto_continue_delay_ms)
    }
}
