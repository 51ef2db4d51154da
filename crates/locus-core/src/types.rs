//! Core data types for the Locus classification pipeline.
//!
//! All three types are built fresh per analysis and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// The fixed set of place categories the classifier is asked to choose from.
pub const PLACE_CATEGORIES: [&str; 5] = ["restaurant", "sightseeing", "shopping", "hotel", "park"];

/// Upper bound on `AnalysisResult::all_tags`.
pub const MAX_RESULT_TAGS: usize = 10;

/// Upper bound on `AnalysisResult::top_categories`.
pub const MAX_RESULT_CATEGORIES: usize = 2;

/// Whether `name` is one of [`PLACE_CATEGORIES`] (case-insensitive).
pub fn is_place_category(name: &str) -> bool {
    PLACE_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(name.trim()))
}

/// A label from local image classification with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTag {
    /// Model label (e.g., "restaurant_sign", "table")
    pub label: String,

    /// Confidence score from 0.0 to 1.0
    pub confidence: f32,
}

impl WeightedTag {
    /// Create a new tag with the given label and confidence.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Return the `n` most confident tags, highest first.
///
/// The sort is stable, so tags with equal confidence keep their extraction order.
pub fn top_by_confidence(tags: &[WeightedTag], n: usize) -> Vec<WeightedTag> {
    let mut ranked = tags.to_vec();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked.truncate(n);
    ranked
}

/// One place category assigned by the remote classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPrediction {
    /// Category name (e.g., "restaurant", "park")
    pub category: String,

    /// Confidence score from 0.0 to 1.0
    pub confidence: f32,

    /// Tags the classifier cited as evidence, drawn from the request's tag set
    pub contributing_tags: Vec<WeightedTag>,
}

/// The caller-facing outcome of a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Highest-ranked categories, in the classifier's order
    pub top_categories: Vec<CategoryPrediction>,

    /// Most confident raw tags, highest first
    pub all_tags: Vec<WeightedTag>,
}
