use std::path::Path;

use clap::Subcommand;
use pomopixel_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.automatic_sequence", "alerts.cue")
        key: String,
    },
    /// List all config values
    List,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(
    action: ConfigAction,
    config: &Config,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => println!("{}", config.get(&key)?),
        ConfigAction::List => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{json}");
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(format!("{} already exists (use --force)", path.display()).into());
            }
            Config::default().save_to(path)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
