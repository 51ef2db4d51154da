//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{MAX_RESULT_CATEGORIES, MAX_RESULT_TAGS};

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where models are stored
    pub model_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("~/.locus/models"),
        }
    }
}

/// Local tag extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Model directory name under `general.model_dir`
    pub model: String,

    /// Square input size the model expects
    pub image_size: u32,

    /// Minimum confidence a tag needs before it is sent to the classifier.
    /// A deliberately low bar: this is a pre-filter, not a decision.
    pub confidence_threshold: f32,

    /// Number of raw tags reported back to the caller
    pub max_tags: usize,

    /// Apply softmax to the model output (disable if the model already
    /// ends in a softmax layer)
    pub apply_softmax: bool,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            model: "mobilenetv2".to_string(),
            image_size: 224,
            confidence_threshold: 0.02,
            max_tags: MAX_RESULT_TAGS,
            apply_softmax: true,
        }
    }
}

/// Remote category classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Number of tags included in the prompt
    pub top_n: usize,

    /// Number of categories kept in the final result
    pub max_categories: usize,

    /// Sampling temperature; low values favor schema-conforming output
    pub temperature: f32,

    /// Reject categories outside the fixed place set instead of passing them through
    pub strict_categories: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            max_categories: MAX_RESULT_CATEGORIES,
            temperature: 0.3,
            strict_categories: false,
        }
    }
}

/// Retry settings for the classification stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Max retry attempts for transient failures
    pub retry_attempts: u32,

    /// Base delay between retries in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_attempts: 2,
            retry_delay_ms: 1000,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// LLM call timeout in milliseconds
    pub llm_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
            decode_timeout_ms: 5000,
            llm_timeout_ms: 60000,
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions configuration
    pub openai: OpenAiConfig,
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Chat completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-3.5-turbo".to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Analysis history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Append a record after every successful analysis
    pub enabled: bool,

    /// JSONL file holding one record per analysis
    pub path: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.locus/history.jsonl".to_string(),
        }
    }
}
