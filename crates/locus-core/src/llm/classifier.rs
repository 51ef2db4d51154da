//! Category classification of weighted tags via a remote LLM.
//!
//! One call = one request. The classifier selects the strongest tags, asks the
//! provider for categories, and validates the reply. It never retries; that
//! policy belongs to whoever drives it.

use std::sync::Arc;

use super::payload::parse_categories;
use super::prompt::classification_request;
use super::provider::LlmProvider;
use crate::config::ClassifierConfig;
use crate::error::PipelineError;
use crate::types::{top_by_confidence, CategoryPrediction, WeightedTag};

/// Options for the category classifier.
#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    /// Number of tags sent to the endpoint
    pub top_n: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Reject categories outside the fixed place set
    pub strict_categories: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self::from(&ClassifierConfig::default())
    }
}

impl From<&ClassifierConfig> for ClassifierOptions {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            top_n: config.top_n,
            temperature: config.temperature,
            strict_categories: config.strict_categories,
        }
    }
}

/// Turns weighted tags into ranked place categories.
pub struct CategoryClassifier {
    provider: Arc<dyn LlmProvider>,
    options: ClassifierOptions,
}

impl CategoryClassifier {
    pub fn new(provider: Arc<dyn LlmProvider>, options: ClassifierOptions) -> Self {
        Self { provider, options }
    }

    /// Classify using the configured `top_n`.
    pub async fn classify(
        &self,
        tags: &[WeightedTag],
    ) -> Result<Vec<CategoryPrediction>, PipelineError> {
        self.classify_top_n(tags, self.options.top_n).await
    }

    /// Classify using the `top_n` most confident tags.
    ///
    /// `tags` need not be sorted. Ties keep their original order so the same
    /// input always produces the same request.
    pub async fn classify_top_n(
        &self,
        tags: &[WeightedTag],
        top_n: usize,
    ) -> Result<Vec<CategoryPrediction>, PipelineError> {
        let selected = top_by_confidence(tags, top_n);
        if selected.is_empty() {
            return Err(PipelineError::Tagging {
                message: "No tags to classify".to_string(),
            });
        }

        let request = classification_request(&selected, self.options.temperature);
        tracing::debug!(
            "Classifying {} tag(s) via {}",
            selected.len(),
            self.provider.name()
        );

        let response = self.provider.generate(&request).await?;
        tracing::debug!(
            "{} answered in {}ms (model: {}, tokens: {:?})",
            self.provider.name(),
            response.latency_ms,
            response.model,
            response.tokens_used
        );

        parse_categories(&response.text, &selected, self.options.strict_categories)
    }
}
