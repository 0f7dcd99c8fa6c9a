mod config;

pub use config::{AlertsConfig, Config, LogConfig, TimerConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomopixel[-dev]/` based on POMOPIXEL_ENV.
///
/// Set POMOPIXEL_ENV=dev to use the development directory. The directory is
/// not created here; [`Config::save_to`] creates it when writing.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("POMOPIXEL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomopixel-dev")
    } else {
        base_dir.join("pomopixel")
    };
    Ok(dir)
}
