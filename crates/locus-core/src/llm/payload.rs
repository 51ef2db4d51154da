//! Parsing and validation of the classifier's JSON payload.
//!
//! The payload is the assistant text from inside the response envelope. It is
//! untrusted: every entry is checked, and any bad entry rejects the whole reply.

use serde::Deserialize;

use super::prompt::render_confidence;
use crate::error::PipelineError;
use crate::types::{is_place_category, CategoryPrediction, WeightedTag};

#[derive(Debug, Deserialize)]
struct CategoryPayload {
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    category: String,
    confidence: f32,
    contributing_tags: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    tag: String,
    confidence: f32,
}

/// Drop a surrounding markdown code fence (```json ... ```), if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn check_confidence(value: f32, what: &str) -> Result<(), PipelineError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PipelineError::malformed_payload(format!(
            "{what} confidence {value} is outside [0, 1]"
        )))
    }
}

/// Find the request tag a contributing tag refers to.
///
/// Labels must match exactly; confidences must render to the same text the
/// prompt showed.
fn match_request_tag<'a>(entry: &TagEntry, request: &'a [WeightedTag]) -> Option<&'a WeightedTag> {
    let cited = render_confidence(entry.confidence);
    request
        .iter()
        .find(|tag| tag.label == entry.tag && render_confidence(tag.confidence) == cited)
}

/// Parse assistant text into validated category predictions.
///
/// `request` is the exact tag list sent in the prompt. Contributing tags are
/// replaced by the matching request tag, so callers only ever see tags they
/// supplied. Categories come back ordered by confidence, highest first; ties
/// keep the order the endpoint used.
pub fn parse_categories(
    text: &str,
    request: &[WeightedTag],
    strict_categories: bool,
) -> Result<Vec<CategoryPrediction>, PipelineError> {
    let payload: CategoryPayload = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| PipelineError::malformed_payload(format!("does not match schema: {e}")))?;

    let mut predictions = Vec::with_capacity(payload.categories.len());
    for entry in payload.categories {
        let category = entry.category.trim();
        if category.is_empty() {
            return Err(PipelineError::malformed_payload("empty category name"));
        }
        check_confidence(entry.confidence, &format!("category '{category}'"))?;

        if !is_place_category(category) {
            if strict_categories {
                return Err(PipelineError::malformed_payload(format!(
                    "category '{category}' is not a known place category"
                )));
            }
            tracing::warn!("Classifier returned out-of-set category '{category}'");
        }

        let mut contributing_tags = Vec::with_capacity(entry.contributing_tags.len());
        for tag in &entry.contributing_tags {
            check_confidence(tag.confidence, &format!("tag '{}'", tag.tag))?;
            let known = match_request_tag(tag, request).ok_or_else(|| {
                PipelineError::malformed_payload(format!(
                    "contributing tag '{}' ({}) was not in the request",
                    tag.tag,
                    render_confidence(tag.confidence)
                ))
            })?;
            contributing_tags.push(known.clone());
        }

        predictions.push(CategoryPrediction {
            category: category.to_string(),
            confidence: entry.confidence,
            contributing_tags,
        });
    }

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResponseLayer;

    fn request_tags() -> Vec<WeightedTag> {
        vec![
            WeightedTag::new("restaurant_sign", 0.8134),
            WeightedTag::new("table", 0.40),
            WeightedTag::new("chair", 0.35),
        ]
    }

    fn assert_payload_error(result: Result<Vec<CategoryPrediction>, PipelineError>, needle: &str) {
        match result {
            Err(PipelineError::MalformedResponse {
                layer: ResponseLayer::Payload,
                message,
            }) => assert!(message.contains(needle), "unexpected message: {message}"),
            other => panic!("Expected payload error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_valid_payload() {
        let text = r#"{"categories":[
            {"category":"restaurant","confidence":0.9,"contributing_tags":[
                {"tag":"restaurant_sign","confidence":0.81},{"tag":"table","confidence":0.40}]},
            {"category":"hotel","confidence":0.2,"contributing_tags":[]}]}"#;
        let predictions = parse_categories(text, &request_tags(), false).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].category, "restaurant");
        // The request's own tag comes back, full precision intact.
        assert_eq!(
            predictions[0].contributing_tags[0],
            WeightedTag::new("restaurant_sign", 0.8134)
        );
        assert_eq!(predictions[1].contributing_tags.len(), 0);
    }

    #[test]
    fn test_parse_rejects_fabricated_tag() {
        let text = r#"{"categories":[{"category":"park","confidence":0.5,
            "contributing_tags":[{"tag":"unicorn","confidence":0.5}]}]}"#;
        assert_payload_error(parse_categories(text, &request_tags(), false), "unicorn");
    }

    #[test]
    fn test_parse_rejects_known_label_with_wrong_confidence() {
        let text = r#"{"categories":[{"category":"restaurant","confidence":0.5,
            "contributing_tags":[{"tag":"table","confidence":0.95}]}]}"#;
        assert_payload_error(parse_categories(text, &request_tags(), false), "table");
    }

    #[test]
    fn test_parse_rejects_non_json_text() {
        assert_payload_error(
            parse_categories("I think it's a restaurant.", &request_tags(), false),
            "schema",
        );
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let text = r#"{"categories":[{"category":"park","contributing_tags":[]}]}"#;
        assert_payload_error(parse_categories(text, &request_tags(), false), "confidence");
    }

    #[test]
    fn test_parse_rejects_mistyped_confidence() {
        let text = r#"{"categories":[{"category":"park","confidence":"high","contributing_tags":[]}]}"#;
        assert_payload_error(parse_categories(text, &request_tags(), false), "schema");
    }

    #[test]
    fn test_parse_rejects_malformed_tag_entry() {
        let text = r#"{"categories":[{"category":"park","confidence":0.4,
            "contributing_tags":[{"name":"table","confidence":0.40}]}]}"#;
        assert_payload_error(parse_categories(text, &request_tags(), false), "tag");
    }

    #[test]
    fn test_parse_rejects_out_of_range_confidence() {
        let text = r#"{"categories":[{"category":"park","confidence":1.7,"contributing_tags":[]}]}"#;
        assert_payload_error(parse_categories(text, &request_tags(), false), "outside");
    }

    #[test]
    fn test_one_bad_entry_rejects_whole_reply() {
        let text = r#"{"categories":[
            {"category":"restaurant","confidence":0.9,"contributing_tags":[]},
            {"category":"park","confidence":0.1,"contributing_tags":[{"tag":"tree","confidence":0.1}]}]}"#;
        assert!(parse_categories(text, &request_tags(), false).is_err());
    }

    #[test]
    fn test_out_of_set_category_passes_unless_strict() {
        let text = r#"{"categories":[{"category":"cafe","confidence":0.3,"contributing_tags":[]}]}"#;
        let predictions = parse_categories(text, &request_tags(), false).unwrap();
        assert_eq!(predictions[0].category, "cafe");

        assert_payload_error(parse_categories(text, &request_tags(), true), "cafe");
    }

    #[test]
    fn test_categories_sorted_by_confidence() {
        let text = r#"{"categories":[
            {"category":"park","confidence":0.2,"contributing_tags":[]},
            {"category":"shopping","confidence":0.7,"contributing_tags":[]},
            {"category":"hotel","confidence":0.2,"contributing_tags":[]}]}"#;
        let predictions = parse_categories(text, &request_tags(), false).unwrap();
        let names: Vec<&str> = predictions.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(names, vec!["shopping", "park", "hotel"]);
    }

    #[test]
    fn test_code_fenced_payload_is_accepted() {
        let text = "```json\n{\"categories\":[{\"category\":\"park\",\"confidence\":0.6,\"contributing_tags\":[]}]}\n```";
        let predictions = parse_categories(text, &request_tags(), false).unwrap();
        assert_eq!(predictions[0].category, "park");
    }

    /// Echo every tag of `tags` back exactly as the prompt rendered it.
    fn echo_reply(tags: &[WeightedTag]) -> String {
        let cited: Vec<String> = tags
            .iter()
            .map(|t| {
                format!(
                    r#"{{"tag":"{}","confidence":{}}}"#,
                    t.label,
                    render_confidence(t.confidence)
                )
            })
            .collect();
        format!(
            r#"{{"categories":[{{"category":"park","confidence":0.5,"contributing_tags":[{}]}}]}}"#,
            cited.join(",")
        )
    }

    #[test]
    fn test_half_hundredth_confidences_match_as_rendered() {
        let tags = vec![
            WeightedTag::new("fountain", 0.055),
            WeightedTag::new("bench", 0.105),
            WeightedTag::new("tree", 0.945),
            WeightedTag::new("path", 0.005),
        ];
        let request = crate::llm::prompt::classification_request(&tags, 0.3);
        for tag in &tags {
            let line = format!(
                "- {} (confidence: {})",
                tag.label,
                render_confidence(tag.confidence)
            );
            assert!(request.prompt.contains(&line), "missing {line}");
        }

        let predictions = parse_categories(&echo_reply(&tags), &tags, false).unwrap();
        assert_eq!(predictions[0].contributing_tags, tags);
    }

    #[test]
    fn test_every_rendered_confidence_round_trips() {
        let tags: Vec<WeightedTag> = (0..=1000)
            .map(|i| WeightedTag::new(format!("t{i}"), i as f32 / 1000.0))
            .collect();
        for chunk in tags.chunks(100) {
            assert!(
                parse_categories(&echo_reply(chunk), chunk, false).is_ok(),
                "echoed confidences rejected in chunk starting at {}",
                chunk[0].label
            );
        }
    }

    #[test]
    fn test_strip_code_fence_passthrough() {
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }
}
