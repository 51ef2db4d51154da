//! LLM provider trait and request/response types.
//!
//! Defines the interface the category classifier talks to, plus credential
//! resolution for providers that need an API key.

use crate::config::OpenAiConfig;
use crate::error::{ConfigError, PipelineError};
use async_trait::async_trait;
use std::time::Duration;

/// Placeholder shipped in sample configs; never a real key.
const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// A two-message chat exchange: a system role and a user instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// System message establishing the assistant's purpose
    pub system: String,
    /// User message carrying the instruction
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
}

/// The assistant text extracted from the endpoint's response envelope.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Raw assistant content, not yet parsed
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn LlmProvider>` for dynamic dispatch).
///
/// Implementations unwrap the transport envelope and hand back the assistant
/// text; they never interpret that text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai").
    fn name(&self) -> &str;

    /// Send the exchange and return the assistant text.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError>;

    /// Per-request timeout enforced by the transport.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolve the OpenAI API key, rejecting absent or placeholder values.
///
/// Runs when the analyzer is built so a bad key is reported before any
/// network call is attempted.
pub fn resolve_api_key(config: &OpenAiConfig) -> Result<String, ConfigError> {
    let key = resolve_env_var(config.api_key.trim())
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    match key {
        Some(k) if k == PLACEHOLDER_API_KEY => Err(ConfigError::MissingCredential(
            "OpenAI API key is still the placeholder value. Set OPENAI_API_KEY or llm.openai.api_key."
                .to_string(),
        )),
        Some(k) => Ok(k),
        None => Err(ConfigError::MissingCredential(
            "OpenAI API key not set. Set OPENAI_API_KEY env var or llm.openai.api_key.".to_string(),
        )),
    }
}
