//! Prompt construction for tag-based place classification.

use super::provider::LlmRequest;
use crate::types::{WeightedTag, PLACE_CATEGORIES};

/// System message establishing the assistant's role.
const SYSTEM_PROMPT: &str =
    "You are an assistant that classifies photos into place categories using their image tags. \
     You always answer with a single JSON object and nothing else.";

/// JSON shape the assistant must reply with.
const RESPONSE_SCHEMA: &str = r#"{
  "categories": [
    {
      "category": "category_name",
      "confidence": 0.0,
      "contributing_tags": [
        { "tag": "tag_name", "confidence": 0.0 }
      ]
    }
  ]
}"#;

/// A confidence as the prompt shows it. Contributing tags are matched on
/// this exact text, so prompt and payload parsing must both go through here.
pub(crate) fn render_confidence(confidence: f32) -> String {
    format!("{confidence:.2}")
}

fn render_tag(tag: &WeightedTag) -> String {
    format!(
        "- {} (confidence: {})",
        tag.label,
        render_confidence(tag.confidence)
    )
}

/// Build the classification exchange for an already-selected tag list.
pub fn classification_request(tags: &[WeightedTag], temperature: f32) -> LlmRequest {
    let tag_lines: Vec<String> = tags.iter().map(render_tag).collect();

    let prompt = format!(
        "These tags were detected in a photo, each with the detector's confidence.\n\
         Classify the photo into these place categories: {categories}.\n\
         Give every plausible category a confidence between 0 and 1 and list the tags \
         that support it. Only cite tags from the list below, copying the tag name and \
         confidence exactly as written. Order categories from most to least likely.\n\
         \n\
         Tags:\n\
         {tags}\n\
         \n\
         Respond with JSON in exactly this structure:\n\
         {schema}",
        categories = PLACE_CATEGORIES.join(", "),
        tags = tag_lines.join("\n"),
        schema = RESPONSE_SCHEMA,
    );

    LlmRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt,
        temperature,
    }
}
