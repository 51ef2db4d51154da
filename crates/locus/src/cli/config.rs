//! The `locus config` command.

use clap::{Args, Subcommand};
use locus_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with the defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let path = Config::default_path();

    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            if path.exists() {
                println!("# Loaded from {}", path.display());
            } else {
                println!("# No config file at {}, showing defaults", path.display());
            }
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
        }

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(&path, Config::default().to_toml()?)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
            println!("Set OPENAI_API_KEY or edit llm.openai.api_key before running `locus analyze`.");
        }
    }

    Ok(())
}
