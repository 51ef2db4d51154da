//! Locus Core - Embeddable photo place classification library.
//!
//! Locus classifies a single photo into place categories (restaurant,
//! sightseeing, shopping, hotel, park). A local ONNX model tags the image,
//! then a remote LLM turns the strongest tags into ranked categories.
//!
//! # Architecture
//!
//! ```text
//! Image bytes → Decode → Tag (ONNX) → Classify (LLM) → AnalysisResult
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use locus_core::{Analyzer, Config};
//!
//! #[tokio::main]
//! async fn main() -> locus_core::Result<()> {
//!     let config = Config::load()?;
//!     let analyzer = Analyzer::from_config(&config)?;
//!
//!     let bytes = std::fs::read("./photo.jpg")?;
//!     if let Some(result) = analyzer.analyze(bytes, |status| eprintln!("{status}")).await {
//!         println!("{:?}", result.top_categories);
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod analyzer;
pub mod config;
pub mod error;
pub mod llm;
mod math;
pub mod output;
pub mod pipeline;
pub mod tagging;
pub mod types;

// Re-exports for convenient access
pub use analyzer::{AnalysisStage, AnalyzeOptions, Analyzer, CancelToken};
pub use config::Config;
pub use error::{ConfigError, LocusError, PipelineError, PipelineResult, ResponseLayer, Result};
pub use llm::{CategoryClassifier, ClassifierOptions};
pub use output::{OutputFormat, OutputWriter};
pub use tagging::{ImageTagger, TagExtractor};
pub use types::{AnalysisResult, CategoryPrediction, WeightedTag, PLACE_CATEGORIES};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
