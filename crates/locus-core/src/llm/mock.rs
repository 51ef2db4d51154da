//! Scriptable LLM provider shared by classifier and analyzer tests.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::error::PipelineError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ResponseFn = Box<dyn Fn(u32) -> Result<LlmResponse, PipelineError> + Send + Sync>;

/// Each call to `generate()` invokes the response factory with the current
/// call index, so tests can vary results per attempt.
pub(crate) struct MockProvider {
    response_fn: ResponseFn,
    call_count: Arc<AtomicU32>,
    last_request: Arc<Mutex<Option<LlmRequest>>>,
}

impl MockProvider {
    fn from_fn(response_fn: ResponseFn) -> Self {
        Self {
            response_fn,
            call_count: Arc::new(AtomicU32::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Always answer with the given assistant text.
    pub(crate) fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(Box::new(move |_| Ok(response(&text))))
    }

    /// Always fail with a network error carrying `status_code`.
    pub(crate) fn failing(status_code: Option<u16>, message: &str) -> Self {
        let message = message.to_string();
        Self::from_fn(Box::new(move |_| {
            Err(PipelineError::Network {
                message: message.clone(),
                status_code,
            })
        }))
    }

    /// First call fails with `status_code`, later calls answer with `text`.
    pub(crate) fn fail_then_reply(status_code: u16, text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(Box::new(move |idx| {
            if idx == 0 {
                Err(PipelineError::Network {
                    message: format!("HTTP {status_code}"),
                    status_code: Some(status_code),
                })
            } else {
                Ok(response(&text))
            }
        }))
    }

    /// Always fail with the error the closure builds.
    pub(crate) fn erroring(make: impl Fn() -> PipelineError + Send + Sync + 'static) -> Self {
        Self::from_fn(Box::new(move |_| Err(make())))
    }

    /// Shared handle to the call counter (clone before moving the provider).
    pub(crate) fn call_count_handle(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }

    /// Shared handle to the most recent request.
    pub(crate) fn last_request_handle(&self) -> Arc<Mutex<Option<LlmRequest>>> {
        self.last_request.clone()
    }
}

fn response(text: &str) -> LlmResponse {
    LlmResponse {
        text: text.to_string(),
        model: "mock-v1".to_string(),
        tokens_used: Some(42),
        latency_ms: 10,
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        (self.response_fn)(idx)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
