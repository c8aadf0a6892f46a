//! Parsing of the model's raw output into a `ClassificationResult`.
//!
//! The output comes from a remote service and is treated as untrusted data:
//! it is parsed strictly as JSON and validated field by field. Nothing in it
//! is ever evaluated.

use serde::Deserialize;

use crate::error::ParseError;
use crate::pipeline::types::{Classification, ClassificationResult};

/// Shape the prompt asks the model to produce.
#[derive(Debug, Deserialize)]
struct RawClassification {
    classification: String,
    #[serde(alias = "suggested_response")]
    response: String,
}

/// Parse raw model output.
///
/// The whole output must be a single JSON object, optionally wrapped in one
/// Markdown code fence. Trailing text, Python-style dicts, truncated objects
/// and unknown labels are all rejected.
pub fn parse_classification(raw: &str) -> Result<ClassificationResult, ParseError> {
    let json = strip_code_fence(raw);
    let parsed: RawClassification = serde_json::from_str(json)?;

    let classification = Classification::from_label(&parsed.classification)
        .ok_or(ParseError::UnknownClassification(parsed.classification))?;

    Ok(ClassificationResult::new(classification, parsed.response))
}

/// Remove a fence that wraps the entire output (```json ... ``` or ``` ... ```).
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = after_open.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening line.
    match inner.find('\n') {
        Some(newline) if inner[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            inner[newline + 1..].trim()
        }
        _ => inner.trim(),
    }
}
