//! Configuration management commands.

use std::path::Path;

use clap::Args;
use factory_core::config::Config;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, config: &Config, path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{}", json);
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            Config::default().save(path)?;
            println!("Created config file: {}", path.display());
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
