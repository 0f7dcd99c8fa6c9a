use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomopixel-cli", version, about = "PomoPixel CLI")]
struct Cli {
    /// Config file (default: ~/.config/pomopixel/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive timer session
    Run {
        /// Wait for `continue` after each session instead of advancing
        #[arg(long)]
        no_auto: bool,
        /// Alert cue (short, medium_01, medium_02, long)
        #[arg(long)]
        cue: Option<String>,
    },
    /// Print the initial timer state as JSON
    Status,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let result = commands::resolve_config(cli.config.as_deref())
        .map_err(Box::<dyn std::error::Error>::from)
        .and_then(|(config, path)| {
            init_tracing(&config.log.filter);
            match cli.command {
                Commands::Run { no_auto, cue } => commands::run::run(config, no_auto, cue),
                Commands::Status => commands::status::run(&config),
                Commands::Config { action } => commands::config::run(action, &config, &path),
            }
        });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
