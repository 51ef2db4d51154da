//! Analysis orchestration: decode, tag, classify, rank.
//!
//! The analyzer is the boundary where typed errors stop. Every failure from
//! the decoder, the tagger or the classifier becomes `None` plus a progress
//! message; callers get either a complete `AnalysisResult` or nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::llm::classifier::{CategoryClassifier, ClassifierOptions};
use crate::llm::openai::OpenAiProvider;
use crate::llm::provider::resolve_api_key;
use crate::llm::retry;
use crate::pipeline::ImageDecoder;
use crate::tagging::{apply_threshold, ImageTagger, TagExtractor};
use crate::types::{
    top_by_confidence, AnalysisResult, CategoryPrediction, WeightedTag, MAX_RESULT_CATEGORIES,
    MAX_RESULT_TAGS,
};

/// Where an analysis run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Decoding,
    Tagging,
    Classifying,
    Done,
    Failed,
}

impl AnalysisStage {
    /// Human-readable status reported through the progress callback.
    pub fn status(&self) -> &'static str {
        match self {
            AnalysisStage::Decoding => "Decoding image...",
            AnalysisStage::Tagging => "Extracting tags...",
            AnalysisStage::Classifying => "Classifying place...",
            AnalysisStage::Done => "Analysis complete",
            AnalysisStage::Failed => "Analysis failed",
        }
    }
}

/// Cooperative cancellation flag, checked between stages.
///
/// Clones share the same flag, so the caller keeps one and hands another
/// to the run it may want to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The run stops at its next stage boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> std::result::Result<(), PipelineError> {
        if self.is_cancelled() {
            Err(PipelineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Options for shaping the analysis result.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Raw tags kept in `all_tags`, capped at [`MAX_RESULT_TAGS`]
    pub max_tags: usize,
    /// Categories kept in `top_categories`, capped at [`MAX_RESULT_CATEGORIES`]
    pub max_categories: usize,
    /// Max retries of the classification stage for transient failures
    pub retry_attempts: u32,
    /// Base backoff delay in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for AnalyzeOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_tags: config.tagging.max_tags,
            max_categories: config.classifier.max_categories,
            retry_attempts: config.pipeline.retry_attempts,
            retry_delay_ms: config.pipeline.retry_delay_ms,
        }
    }
}

/// Runs one photo through tagging and classification.
///
/// Holds no per-run state; concurrent `analyze` calls are independent.
pub struct Analyzer {
    decoder: ImageDecoder,
    tagger: Arc<dyn ImageTagger>,
    classifier: CategoryClassifier,
    options: AnalyzeOptions,
}

impl Analyzer {
    /// Assemble an analyzer from already-built parts.
    pub fn new(
        decoder: ImageDecoder,
        tagger: Arc<dyn ImageTagger>,
        classifier: CategoryClassifier,
        options: AnalyzeOptions,
    ) -> Self {
        Self {
            decoder,
            tagger,
            classifier,
            options,
        }
    }

    /// Build the production analyzer: ONNX tagger plus OpenAI classifier.
    ///
    /// The credential is checked first, so a missing key is reported without
    /// paying for a model load. A missing or broken model is returned as
    /// `ModelUnavailable`; neither condition will fix itself per call.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = resolve_api_key(&config.llm.openai)?;
        let tagger = TagExtractor::load(&config.tagging, &config.model_dir())?;

        let openai = &config.llm.openai;
        let provider = OpenAiProvider::with_endpoint(
            &api_key,
            &openai.model,
            &openai.endpoint,
            Duration::from_millis(config.limits.llm_timeout_ms),
        );
        let classifier = CategoryClassifier::new(
            Arc::new(provider),
            ClassifierOptions::from(&config.classifier),
        );

        Ok(Self::new(
            ImageDecoder::new(config.limits.clone()),
            Arc::new(tagger),
            classifier,
            AnalyzeOptions::from(config),
        ))
    }

    /// Analyze an encoded image.
    ///
    /// `on_progress` is invoked synchronously at every stage transition. It is
    /// advisory only; on failure it receives the reason and the call returns
    /// `None`.
    pub async fn analyze<F>(&self, image: Vec<u8>, on_progress: F) -> Option<AnalysisResult>
    where
        F: Fn(&str) + Send + Sync,
    {
        self.analyze_with_cancel(image, on_progress, &CancelToken::new())
            .await
    }

    /// Like [`analyze`](Self::analyze), stopping cleanly if `cancel` fires
    /// before the tagging or classification stage begins.
    pub async fn analyze_with_cancel<F>(
        &self,
        image: Vec<u8>,
        on_progress: F,
        cancel: &CancelToken,
    ) -> Option<AnalysisResult>
    where
        F: Fn(&str) + Send + Sync,
    {
        let start = std::time::Instant::now();
        match self.run(image, &on_progress, cancel).await {
            Ok(result) => {
                tracing::debug!(
                    "Analysis finished in {:?}: {} categor(ies), {} tag(s)",
                    start.elapsed(),
                    result.top_categories.len(),
                    result.all_tags.len()
                );
                on_progress(AnalysisStage::Done.status());
                Some(result)
            }
            Err(PipelineError::Cancelled) => {
                tracing::debug!("Analysis cancelled after {:?}", start.elapsed());
                on_progress("Analysis cancelled");
                None
            }
            Err(e) => {
                tracing::warn!("{}: {e}", AnalysisStage::Failed.status());
                on_progress(&failure_message(&e));
                None
            }
        }
    }

    async fn run<F>(
        &self,
        image: Vec<u8>,
        on_progress: &F,
        cancel: &CancelToken,
    ) -> std::result::Result<AnalysisResult, PipelineError>
    where
        F: Fn(&str) + Send + Sync,
    {
        on_progress(AnalysisStage::Decoding.status());
        let decoded = self.decoder.decode(image).await?;
        tracing::trace!("  Decoded {}x{} {:?}", decoded.width, decoded.height, decoded.format);

        cancel.check()?;
        on_progress(AnalysisStage::Tagging.status());
        let raw = self.raw_predictions(decoded.image).await?;
        if raw.is_empty() {
            return Err(PipelineError::Tagging {
                message: "Model produced no predictions".to_string(),
            });
        }

        let all_tags = top_by_confidence(&raw, self.options.max_tags.min(MAX_RESULT_TAGS));
        let threshold = self.tagger.confidence_threshold();
        let candidates = apply_threshold(raw, threshold);
        if candidates.is_empty() {
            return Err(PipelineError::Tagging {
                message: format!("No tag reached the {threshold} confidence threshold"),
            });
        }
        tracing::trace!("  {} tag(s) passed the threshold", candidates.len());

        cancel.check()?;
        on_progress(AnalysisStage::Classifying.status());
        let categories = self.classify_with_retry(&candidates, cancel).await?;

        Ok(AnalysisResult {
            top_categories: categories
                .into_iter()
                .take(self.options.max_categories.min(MAX_RESULT_CATEGORIES))
                .collect(),
            all_tags,
        })
    }

    /// Inference is CPU-bound, so it runs on the blocking pool.
    async fn raw_predictions(
        &self,
        image: image::DynamicImage,
    ) -> std::result::Result<Vec<WeightedTag>, PipelineError> {
        let tagger = self.tagger.clone();
        tokio::task::spawn_blocking(move || tagger.raw_predictions(&image))
            .await
            .map_err(|e| PipelineError::Inference {
                message: format!("Tagging task failed: {e}"),
            })?
    }

    async fn classify_with_retry(
        &self,
        tags: &[WeightedTag],
        cancel: &CancelToken,
    ) -> std::result::Result<Vec<CategoryPrediction>, PipelineError> {
        let mut attempt = 0;
        loop {
            match self.classifier.classify(tags).await {
                Ok(categories) => return Ok(categories),
                Err(e) if attempt < self.options.retry_attempts && retry::is_retryable(&e) => {
                    let delay = retry::backoff_duration(attempt, self.options.retry_delay_ms);
                    attempt += 1;
                    tracing::debug!(
                        "Retry {attempt}/{} after {delay:?}: {e}",
                        self.options.retry_attempts
                    );
                    tokio::time::sleep(delay).await;
                    cancel.check()?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Progress text for a failed run, naming the stage that gave up.
fn failure_message(error: &PipelineError) -> String {
    let what = match error {
        PipelineError::Decode { .. }
        | PipelineError::Timeout { .. }
        | PipelineError::FileTooLarge { .. }
        | PipelineError::FileNotFound(_) => "Could not read image",
        PipelineError::ModelUnavailable { .. }
        | PipelineError::Inference { .. }
        | PipelineError::Tagging { .. } => "Could not extract tags",
        PipelineError::Network { .. }
        | PipelineError::Authentication { .. }
        | PipelineError::MalformedResponse { .. } => "Could not classify photo",
        PipelineError::Cancelled => "Analysis cancelled",
    };
    format!("{what}: {error}")
}
