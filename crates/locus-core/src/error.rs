//! Error types for the Locus classification pipeline.
//!
//! Errors are organized by stage so the orchestrator can turn each one into a
//! clear progress message before discarding it.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Locus operations.
#[derive(Error, Debug)]
pub enum LocusError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// API credential is absent or still the placeholder value
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

/// Which layer of a remote response failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseLayer {
    /// The endpoint's own transport wrapper (`choices[0].message.content`)
    Envelope,
    /// The assistant text carried inside the envelope
    Payload,
}

impl fmt::Display for ResponseLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseLayer::Envelope => write!(f, "envelope"),
            ResponseLayer::Payload => write!(f, "payload"),
        }
    }
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image bytes could not be decoded or converted to the model's pixel format
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The local model asset could not be loaded
    #[error("Model unavailable at {path}: {message}")]
    ModelUnavailable { path: PathBuf, message: String },

    /// The forward pass failed or produced unusable output
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// Tag extraction produced nothing worth classifying
    #[error("Tagging failed: {message}")]
    Tagging { message: String },

    /// Transport failure or non-success HTTP status
    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
    },

    /// The endpoint rejected the credential
    #[error("Authentication failed (HTTP {status_code}): {message}")]
    Authentication { message: String, status_code: u16 },

    /// The endpoint replied, but not in the agreed shape
    #[error("Malformed {layer} in response: {message}")]
    MalformedResponse {
        layer: ResponseLayer,
        message: String,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The caller cancelled the run between stages
    #[error("Analysis cancelled")]
    Cancelled,
}

impl PipelineError {
    pub(crate) fn malformed_envelope(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            layer: ResponseLayer::Envelope,
            message: message.into(),
        }
    }

    pub(crate) fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            layer: ResponseLayer::Payload,
            message: message.into(),
        }
    }
}

/// Convenience type alias for Locus results.
pub type Result<T> = std::result::Result<T, LocusError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
