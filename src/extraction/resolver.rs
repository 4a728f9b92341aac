//! Parsing model output into extractions.
//!
//! Answers look like `{"extractions": [{"<class>": "<text>",
//! "<class>_attributes": {...}}, ...]}`, optionally inside a code fence.
//! A bare top-level array of items is accepted too.

use std::collections::BTreeMap;

use serde_json::Value;

use super::types::Extraction;
use super::ExtractionError;

/// Suffix marking the attribute object of a class key.
pub const ATTRIBUTE_SUFFIX: &str = "_attributes";

/// Return the body of the first code fence, or the trimmed input if there is none.
pub fn strip_fence(raw: &str) -> &str {
    let Some(open) = raw.find("```") else {
        return raw.trim();
    };
    let after_open = &raw[open + 3..];
    // Skip a language tag such as "json", whether or not a newline follows it.
    let body = after_open.trim_start_matches(|c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')
    });
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Parse a model answer into extractions, in the order the model listed them.
pub fn parse_output(raw: &str, fenced: bool) -> Result<Vec<Extraction>, ExtractionError> {
    let payload = if fenced { strip_fence(raw) } else { raw.trim() };
    if payload.is_empty() {
        return Err(ExtractionError::Resolve("empty model output".to_string()));
    }

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| ExtractionError::Resolve(format!("invalid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("extractions") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ExtractionError::Resolve(
                    "\"extractions\" is not an array".to_string(),
                ))
            }
            None => {
                return Err(ExtractionError::Resolve(
                    "missing \"extractions\" key".to_string(),
                ))
            }
        },
        _ => {
            return Err(ExtractionError::Resolve(
                "expected a JSON object or array".to_string(),
            ))
        }
    };

    let mut extractions = Vec::new();
    for item in &items {
        let Value::Object(obj) = item else {
            continue;
        };

        for (key, value) in obj {
            if key.ends_with(ATTRIBUTE_SUFFIX) {
                continue;
            }
            let Some(text) = scalar_text(value) else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }

            let mut extraction = Extraction::new(key.clone(), text);
            extraction.attributes = obj
                .get(&format!("{}{}", key, ATTRIBUTE_SUFFIX))
                .map(attribute_map)
                .unwrap_or_default();
            extraction.extraction_index = extractions.len();
            extractions.push(extraction);
        }
    }

    Ok(extractions)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn attribute_map(value: &Value) -> BTreeMap<String, String> {
    let Value::Object(obj) = value else {
        return BTreeMap::new();
    };
    obj.iter()
        .filter_map(|(k, v)| {
            let text = match v {
                Value::Array(items) => {
                    let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
                    Some(parts.join(", "))
                }
                other => scalar_text(other),
            }?;
            Some((k.clone(), text))
        })
        .collect()
}
