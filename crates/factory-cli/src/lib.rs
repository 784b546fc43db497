//! Factory command-line interface.

pub mod commands;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use factory_core::config::{Config, LogLevel};
use factory_core::paths;

/// Factory - credential storage for the code factory tools
#[derive(Parser)]
#[command(name = "factory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "FACTORY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage stored credentials
    Secrets(commands::secrets::SecretsArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Resolve the config file path, honoring an explicit override.
pub fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Load the configuration the CLI runs with.
///
/// A missing file yields defaults; a malformed or invalid one is an error.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = config_path(explicit)?;
    let mut config = Config::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    config.apply_env_overrides();
    config
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

/// Default `EnvFilter` directives when `RUST_LOG` is unset.
pub fn log_filter(verbose: u8, level: LogLevel) -> String {
    let level = match verbose {
        0 => level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    ["factory_cli", "factory_core", "factory_secrets"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Secrets(args) => commands::secrets::run(args, &config).await,
        Commands::Config(args) => {
            let path = config_path(cli.config.as_deref())?;
            commands::config::run(args, &config, &path).await
        }
        Commands::Version => {
            println!("factory {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
