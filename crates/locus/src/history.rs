//! Append-only history of past analyses.
//!
//! One JSON object per line, keyed by the photo's content identifier. The
//! file is only ever appended to; reading skips lines it cannot parse.

use chrono::{DateTime, Utc};
use locus_core::{AnalysisResult, OutputFormat, OutputWriter};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A stored record of one successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub id: Uuid,
    /// BLAKE3 hex digest of the analyzed file
    pub photo_identifier: String,
    /// Labels of the result's `all_tags`, highest confidence first
    pub tags: Vec<String>,
    pub analyzed_date: DateTime<Utc>,
}

impl PhotoMetadata {
    pub fn new(photo_identifier: String, result: &AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            photo_identifier,
            tags: result.all_tags.iter().map(|t| t.label.clone()).collect(),
            analyzed_date: Utc::now(),
        }
    }
}

/// JSONL file of [`PhotoMetadata`] records.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file and its directory if needed.
    pub fn append(&self, record: &PhotoMetadata) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = OutputWriter::new(BufWriter::new(file), OutputFormat::JsonLines, false);
        writer.write(record)?;
        writer.flush()?;
        Ok(())
    }

    /// Load every readable record in file order. A missing file is empty history.
    pub fn load(&self) -> anyhow::Result<Vec<PhotoMetadata>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(std::fs::File::open(&self.path)?);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<PhotoMetadata>(&line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping history line {}: {e}", idx + 1),
            }
        }
        Ok(records)
    }

    /// The most recent `limit` records, oldest first.
    pub fn recent(&self, limit: usize) -> anyhow::Result<Vec<PhotoMetadata>> {
        let mut records = self.load()?;
        let skip = records.len().saturating_sub(limit);
        Ok(records.split_off(skip))
    }
}
