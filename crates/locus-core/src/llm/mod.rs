//! Remote category classification.
//!
//! Provides the provider abstraction over the chat-completions endpoint, the
//! prompt and payload contract, and the classifier that ties them together.

pub(crate) mod classifier;
#[cfg(test)]
pub(crate) mod mock;
pub(crate) mod openai;
pub(crate) mod payload;
pub(crate) mod prompt;
pub(crate) mod provider;
pub(crate) mod retry;

pub use classifier::{CategoryClassifier, ClassifierOptions};
pub use openai::OpenAiProvider;
pub use payload::parse_categories;
pub use prompt::classification_request;
pub use provider::{resolve_api_key, LlmProvider, LlmRequest, LlmResponse};
