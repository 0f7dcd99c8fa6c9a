pub mod config;
pub mod run;
pub mod status;

use std::path::{Path, PathBuf};

use pomopixel_core::{error::Result, Config};

/// Load the config at `explicit`, or at the default location.
pub fn resolve_config(explicit: Option<&Path>) -> Result<(Config, PathBuf)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::path()?,
    };
    let config = Config::load_from(&path)?;
    Ok((config, path))
}
