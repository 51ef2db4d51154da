//! Serialization of analysis results and history records.
//!
//! Results are printed as a single JSON document; history records are
//! appended one object per line.

use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON document, optionally pretty-printed
    Json,
    /// One compact JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// A writer that serializes items to JSON or JSONL.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a single item followed by a newline.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json if self.pretty => {
                serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
            }
            // JSONL is never pretty-printed
            OutputFormat::Json | OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
            }
        }
        writeln!(self.writer)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Serialize an item to a JSON string.
pub fn to_json<T: Serialize>(item: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(item)
    } else {
        serde_json::to_string(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnalysisResult, CategoryPrediction, WeightedTag};

    fn result() -> AnalysisResult {
        AnalysisResult {
            top_categories: vec![CategoryPrediction {
                category: "park".to_string(),
                confidence: 0.75,
                contributing_tags: vec![WeightedTag::new("bench", 0.5)],
            }],
            all_tags: vec![WeightedTag::new("bench", 0.5), WeightedTag::new("tree", 0.25)],
        }
    }

    #[test]
    fn test_write_compact_json() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json, false);
        writer.write(&result()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"category\":\"park\""));
        assert!(output.contains("\"label\":\"tree\""));
    }

    #[test]
    fn test_write_pretty_json() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::Json, true);
        writer.write(&result()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.lines().count() > 1);
        let parsed: AnalysisResult = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, result());
    }

    #[test]
    fn test_jsonl_ignores_pretty() {
        let mut writer = OutputWriter::new(Vec::new(), OutputFormat::JsonLines, true);
        writer.write(&result()).unwrap();
        writer.write(&result()).unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_to_json() {
        let compact = to_json(&result(), false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(to_json(&result(), true).unwrap().contains('\n'));
    }
}
