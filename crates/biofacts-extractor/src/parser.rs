//! Parse LLM output into fact records and training pairs

use crate::error::ExtractorError;
use biofacts_domain::{FactRecord, Importance, TrainingPair, DEFAULT_CONFIDENCE};
use serde_json::{Map, Value};
use tracing::warn;

/// Strip optional markdown code-fence wrapping from a model response
///
/// Handles a leading ```` ``` ```` or ```` ```json ```` fence and a trailing
/// ```` ``` ````, on separate lines or inline.
pub fn strip_code_fence(response: &str) -> &str {
    let mut content = response.trim();

    if let Some(rest) = content.strip_prefix("```") {
        content = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
    }

    if let Some(rest) = content.trim_end().strip_suffix("```") {
        content = rest;
    }

    content.trim()
}

/// Parse the response body as a JSON array
fn parse_array(response: &str) -> Result<Vec<Value>, ExtractorError> {
    let json_str = strip_code_fence(response);

    let json: Value = serde_json::from_str(json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    match json {
        Value::Array(items) => Ok(items),
        _ => Err(ExtractorError::InvalidFormat("Expected JSON array".to_string())),
    }
}

/// Parse one category's response into fact records
///
/// Malformed JSON or a non-array body fails the whole response. Inside the
/// array every object becomes a record, in order; missing fields take their
/// defaults and a missing category takes `category`. Non-object elements are
/// skipped, but a non-empty array with no objects at all is a format error.
pub fn parse_fact_response(
    response: &str,
    category: &str,
) -> Result<Vec<FactRecord>, ExtractorError> {
    let items = parse_array(response)?;

    let mut facts = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(obj) => facts.push(parse_fact_object(obj, category)),
            None => warn!("Fact {} in category '{}' is not a JSON object, skipping", idx, category),
        }
    }

    if facts.is_empty() && !items.is_empty() {
        return Err(ExtractorError::InvalidFormat(format!(
            "Array of {} elements contained no fact objects",
            items.len()
        )));
    }

    Ok(facts)
}

/// Build a fact record from a JSON object, applying defaults
fn parse_fact_object(obj: &Map<String, Value>, category: &str) -> FactRecord {
    let text = |key: &str| match obj.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };

    let confidence = match obj.get("confidence") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(DEFAULT_CONFIDENCE),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(DEFAULT_CONFIDENCE),
        _ => DEFAULT_CONFIDENCE,
    };

    let importance = match obj.get("importance").and_then(Value::as_str) {
        Some(label) => Importance::from_label(label).unwrap_or_else(|| {
            warn!("Unknown importance '{}', using medium", label);
            Importance::Medium
        }),
        None => Importance::Medium,
    };

    let verifiable = match obj.get("verifiable") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
        _ => false,
    };

    FactRecord::new(
        text("category").filter(|c| !c.is_empty()).unwrap_or_else(|| category.to_string()),
        text("fact").unwrap_or_default(),
        confidence,
        text("evidence").unwrap_or_default(),
        importance,
        verifiable,
    )
}

/// Parse a synthesis response into training pairs
///
/// Elements that match neither pair shape, or that carry no usable
/// question/answer exchange, are skipped.
pub fn parse_training_pairs(response: &str) -> Result<Vec<TrainingPair>, ExtractorError> {
    let items = parse_array(response)?;

    let mut pairs = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<TrainingPair>(item) {
            Ok(pair) if pair.prompt_and_response().is_some() => pairs.push(pair),
            Ok(_) => warn!("Training pair {} has no question/answer exchange, skipping", idx),
            Err(e) => warn!("Failed to parse training pair {}: {}", idx, e),
        }
    }

    Ok(pairs)
}
