//! The `locus history` command.

use crate::history::HistoryStore;
use clap::Args;
use locus_core::{Config, OutputFormat, OutputWriter};

/// Arguments for the `history` command.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Show only the most recent N records
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

/// Execute the history command.
pub async fn execute(args: HistoryArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let store = HistoryStore::new(config.history_path());

    let records = store.recent(args.limit)?;
    if records.is_empty() {
        tracing::info!("No history recorded at {:?}", store.path());
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(stdout.lock(), OutputFormat::JsonLines, false);
    for record in &records {
        writer.write(record)?;
    }
    writer.flush()?;
    Ok(())
}
