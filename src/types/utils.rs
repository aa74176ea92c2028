//! Shared utility functions for reading loosely-typed backend output.
//!
//! ## JSON Extraction Helpers
//!
//! Provides ergonomic helpers for extracting values from `serde_json::Value`:
//! - `json_string`, `json_string_or` - Extract strings
//! - `json_string_array` - Extract string arrays
//! - `json_bool`, `json_score` - Extract primitives, tolerating stringly-typed values

use serde_json::Value;

// =============================================================================
// JSON Value Extraction Helpers
// =============================================================================

/// Extract string from JSON value by key.
#[inline]
pub fn json_string(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(String::from)
}

/// Extract string with default value.
#[inline]
pub fn json_string_or(value: &Value, key: &str, default: &str) -> String {
    json_string(value, key).unwrap_or_else(|| default.to_string())
}

/// Extract string array from JSON value by key.
///
/// Non-string items are rendered with their JSON text rather than dropped,
/// so section numbers such as `3` or `4.2` survive.
pub fn json_string_array(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Extract boolean with default. Accepts `"true"`/`"false"` strings.
pub fn json_bool(value: &Value, key: &str, default: bool) -> bool {
    match value.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => true,
            "false" | "no" => false,
            _ => default,
        },
        _ => default,
    }
}

/// Extract a 0-100 score. Accepts integers, floats and numeric strings; clamps.
pub fn json_score(value: &Value, key: &str) -> Option<u8> {
    let raw = match value.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if raw.is_nan() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}

// =============================================================================
// String Utilities
// =============================================================================

/// Capitalize the first character of a string.
#[inline]
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Truncate to at most `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('…');
    out
}
