//! OpenAI LLM provider using the Chat Completions API.
//!
//! Sends a system + user exchange as plain-text messages and unwraps
//! `choices[0].message.content` from the response envelope.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Create with a custom endpoint (OpenAI-compatible gateways, tests).
    pub fn with_endpoint(api_key: &str, model: &str, endpoint: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// Assistant text plus bookkeeping pulled out of a response envelope.
#[derive(Debug)]
struct Envelope {
    content: String,
    model: Option<String>,
    tokens_used: Option<u32>,
}

/// Unwrap the Chat Completions envelope.
///
/// Only the envelope is checked here; the content string is returned as-is
/// for the caller to parse.
fn parse_envelope(body: &str) -> Result<Envelope, PipelineError> {
    let chat_resp: ChatResponse = serde_json::from_str(body)
        .map_err(|e| PipelineError::malformed_envelope(format!("not a chat completion: {e}")))?;

    let content = chat_resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::malformed_envelope("empty choices array"))?
        .message
        .content
        .ok_or_else(|| PipelineError::malformed_envelope("choices[0].message.content missing"))?;

    Ok(Envelope {
        content,
        model: chat_resp.model,
        tokens_used: chat_resp.usage.map(|u| u.total_tokens),
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::Network {
                message: format!("OpenAI request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Authentication {
                message: format!("OpenAI rejected the API key: {text}"),
                status_code: status.as_u16(),
            });
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Network {
                message: format!("OpenAI HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let text = resp.text().await.map_err(|e| PipelineError::Network {
            message: format!("Failed to read OpenAI response body: {e}"),
            status_code: None,
        })?;
        let envelope = parse_envelope(&text)?;

        Ok(LlmResponse {
            text: envelope.content,
            model: envelope.model.unwrap_or_else(|| self.model.clone()),
            tokens_used: envelope.tokens_used,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
