//! Local tag extraction.
//!
//! Runs a pretrained multi-class image classifier over a decoded image and
//! turns its output distribution into weighted tags.
//!
//! # Usage
//!
//! ```rust,ignore
//! use locus_core::tagging::{ImageTagger, TagExtractor};
//! use locus_core::Config;
//!
//! let config = Config::default();
//! let extractor = TagExtractor::load(&config.tagging, &config.model_dir())?;
//! let tags = extractor.extract_tags(&decoded_image)?;
//! ```

pub(crate) mod labels;
pub(crate) mod preprocess;
pub(crate) mod session;

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::config::TaggingConfig;
use crate::error::PipelineError;
use crate::math::softmax_in_place;
use crate::types::WeightedTag;

pub use self::labels::LabelSet;
use self::preprocess::preprocess;
use self::session::ClassifierSession;

/// Default minimum confidence for a tag to survive `extract_tags`.
pub const CONFIDENCE_THRESHOLD: f32 = 0.02;

/// The classifier ONNX model filename.
const MODEL_FILENAME: &str = "model.onnx";

/// The class label filename.
const LABELS_FILENAME: &str = "labels.txt";

/// Anything that can turn a decoded image into weighted tags.
///
/// Implementations must be deterministic: the same image yields the same tags.
pub trait ImageTagger: Send + Sync {
    /// Every label the model knows, with its confidence, in model output order.
    fn raw_predictions(&self, image: &DynamicImage) -> Result<Vec<WeightedTag>, PipelineError>;

    /// Tags below this confidence are dropped by `extract_tags`.
    fn confidence_threshold(&self) -> f32 {
        CONFIDENCE_THRESHOLD
    }

    /// Raw predictions with the confidence threshold applied.
    fn extract_tags(&self, image: &DynamicImage) -> Result<Vec<WeightedTag>, PipelineError> {
        let raw = self.raw_predictions(image)?;
        Ok(apply_threshold(raw, self.confidence_threshold()))
    }
}

/// Keep only tags whose confidence reaches `threshold`, preserving order.
pub fn apply_threshold(tags: Vec<WeightedTag>, threshold: f32) -> Vec<WeightedTag> {
    tags.into_iter()
        .filter(|tag| tag.confidence >= threshold)
        .collect()
}

/// ONNX-backed tag extractor.
pub struct TagExtractor {
    session: ClassifierSession,
    labels: LabelSet,
    image_size: u32,
    threshold: f32,
    apply_softmax: bool,
}

impl TagExtractor {
    /// Load the classifier and its labels from the model directory.
    ///
    /// Expects `{model_dir}/{model}/model.onnx` and `{model_dir}/{model}/labels.txt`.
    /// Any failure here is `ModelUnavailable`: the installation is broken and
    /// no image will succeed, so callers should stop rather than retry.
    pub fn load(config: &TaggingConfig, model_dir: &Path) -> Result<Self, PipelineError> {
        let model_path = Self::model_path(config, model_dir);
        if !model_path.exists() {
            return Err(PipelineError::ModelUnavailable {
                path: model_path,
                message: "Model not found. Place an ONNX classifier and labels.txt there."
                    .to_string(),
            });
        }

        let labels = LabelSet::load(&Self::labels_path(config, model_dir))?;

        tracing::info!("Loading tagging model from {:?}", model_path);
        let session = ClassifierSession::load(&model_path)?;
        tracing::info!("Tagging model loaded ({} labels)", labels.len());

        Ok(Self {
            session,
            labels,
            image_size: config.image_size,
            threshold: config.confidence_threshold,
            apply_softmax: config.apply_softmax,
        })
    }

    /// Check whether the model files exist on disk.
    pub fn model_exists(config: &TaggingConfig, model_dir: &Path) -> bool {
        Self::model_path(config, model_dir).exists() && Self::labels_path(config, model_dir).exists()
    }

    /// Get the expected model file path.
    pub fn model_path(config: &TaggingConfig, model_dir: &Path) -> PathBuf {
        model_dir.join(&config.model).join(MODEL_FILENAME)
    }

    /// Get the expected label file path.
    pub fn labels_path(config: &TaggingConfig, model_dir: &Path) -> PathBuf {
        model_dir.join(&config.model).join(LABELS_FILENAME)
    }
}

impl ImageTagger for TagExtractor {
    fn raw_predictions(&self, image: &DynamicImage) -> Result<Vec<WeightedTag>, PipelineError> {
        let tensor = preprocess(image, self.image_size)?;
        let mut scores = self.session.run(&tensor)?;
        if self.apply_softmax {
            softmax_in_place(&mut scores);
        }
        label_scores(&self.labels, &scores)
    }

    fn confidence_threshold(&self) -> f32 {
        self.threshold
    }
}

/// Pair each label with its score. The model and label file must agree on
/// size, and every score must be finite.
fn label_scores(labels: &LabelSet, scores: &[f32]) -> Result<Vec<WeightedTag>, PipelineError> {
    if scores.len() != labels.len() {
        return Err(PipelineError::Inference {
            message: format!(
                "Model produced {} scores but {} labels are loaded",
                scores.len(),
                labels.len()
            ),
        });
    }
    labels
        .iter()
        .zip(scores)
        .map(|(label, &score)| {
            if !score.is_finite() {
                return Err(PipelineError::Inference {
                    message: format!("Model produced non-finite score {score} for '{label}'"),
                });
            }
            Ok(WeightedTag::new(label, score.clamp(0.0, 1.0)))
        })
        .collect()
}
