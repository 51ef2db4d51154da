//! The `locus models` command.
//!
//! Models are installed by hand: each one is a directory under the model
//! directory holding `model.onnx` and `labels.txt`.

use clap::{Args, Subcommand};
use locus_core::config::TaggingConfig;
use locus_core::{Config, TagExtractor};
use std::path::Path;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model inspection.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List model directories and whether each is complete
    List,

    /// Show model directory path
    Path,
}

/// One directory under the model directory.
#[derive(Debug, PartialEq)]
pub struct ModelEntry {
    pub name: String,
    pub complete: bool,
}

/// Scan `model_dir` for model directories, sorted by name.
pub fn scan_models(model_dir: &Path, tagging: &TaggingConfig) -> std::io::Result<Vec<ModelEntry>> {
    if !model_dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(model_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let probe = TaggingConfig {
            model: name.clone(),
            ..tagging.clone()
        };
        entries.push(ModelEntry {
            complete: TagExtractor::model_exists(&probe, model_dir),
            name,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let model_dir = config.model_dir();

    match args.command {
        ModelsCommand::List => {
            let models = scan_models(&model_dir, &config.tagging)?;
            if models.is_empty() {
                println!("No models installed.");
                println!(
                    "Place an ONNX classifier and labels.txt in {}",
                    model_dir.join(&config.tagging.model).display()
                );
                return Ok(());
            }

            println!("Installed models:");
            println!("  Directory: {}\n", model_dir.display());
            for model in models {
                let status = if model.complete { "ready" } else { "incomplete" };
                let marker = if model.name == config.tagging.model {
                    " (configured)"
                } else {
                    ""
                };
                println!("    - {:30} {:12}{}", model.name, status, marker);
            }
        }

        ModelsCommand::Path => {
            println!("{}", model_dir.display());
        }
    }

    Ok(())
}
