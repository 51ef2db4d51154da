//! The `locus analyze` command.

use crate::history::{HistoryStore, PhotoMetadata};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use locus_core::pipeline::{photo_identifier, Validator};
use locus_core::{AnalysisResult, Analyzer, Config, OutputFormat, OutputWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file to classify
    pub image: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print compact single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Tagging model directory name (overrides `tagging.model`)
    #[arg(long)]
    pub model: Option<String>,

    /// Do not record this analysis in the history file
    #[arg(long)]
    pub no_history: bool,
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(model) = &args.model {
        config.tagging.model = model.clone();
    }

    let bytes = Validator::new(config.limits.clone())
        .read(&args.image)
        .await?;
    let photo_id = photo_identifier(&bytes);
    tracing::debug!("Photo {:?} has identifier {photo_id}", args.image);

    let analyzer = Analyzer::from_config(&config)?;

    let spinner = create_spinner();
    let last_status = Arc::new(Mutex::new(String::new()));
    let result = {
        let spinner = spinner.clone();
        let last_status = last_status.clone();
        analyzer
            .analyze(bytes, move |status| {
                spinner.set_message(status.to_string());
                if let Ok(mut last) = last_status.lock() {
                    *last = status.to_string();
                }
            })
            .await
    };
    spinner.finish_and_clear();

    let Some(result) = result else {
        let reason = last_status
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default();
        anyhow::bail!("No result for {}: {reason}", args.image.display());
    };

    write_result(&result, &args, config.output.pretty && !args.compact)?;

    if config.history.enabled && !args.no_history {
        let store = HistoryStore::new(config.history_path());
        if let Err(e) = store.append(&PhotoMetadata::new(photo_id, &result)) {
            tracing::warn!("Failed to record history in {:?}: {e}", store.path());
        }
    }

    Ok(())
}

fn write_result(result: &AnalysisResult, args: &AnalyzeArgs, pretty: bool) -> anyhow::Result<()> {
    if let Some(output_path) = &args.output {
        let file = File::create(output_path)?;
        let mut writer = OutputWriter::new(BufWriter::new(file), OutputFormat::Json, pretty);
        writer.write(result)?;
        writer.flush()?;
        tracing::info!("Output written to {:?}", output_path);
    } else {
        let stdout = std::io::stdout();
        let mut writer = OutputWriter::new(stdout.lock(), OutputFormat::Json, pretty);
        writer.write(result)?;
        writer.into_inner().flush()?;
    }
    Ok(())
}

fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
