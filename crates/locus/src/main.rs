//! Locus CLI - Classify photos into place categories.
//!
//! A local ONNX model tags the photo; an LLM turns the tags into ranked
//! place categories (restaurant, sightseeing, shopping, hotel, park).
//!
//! # Usage
//!
//! ```bash
//! # Classify a photo
//! locus analyze photo.jpg
//!
//! # Write the result to a file without recording history
//! locus analyze photo.jpg --output result.json --no-history
//!
//! # View configuration
//! locus config show
//!
//! # Past analyses
//! locus history --limit 5
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod history;
mod logging;

/// Locus - Classify photos into place categories.
#[derive(Parser, Debug)]
#[command(name = "locus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a photo into place categories
    Analyze(cli::analyze::AnalyzeArgs),

    /// Inspect installed tagging models
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),

    /// List past analyses
    History(cli::history::HistoryArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match locus_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `locus config path`."
            );
            locus_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Locus v{}", locus_core::VERSION);

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args).await,
        Commands::Models(args) => cli::models::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
        Commands::History(args) => cli::history::execute(args).await,
    }
}
