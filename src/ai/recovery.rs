//! JSON Recovery
//!
//! Reads the structured object out of a backend answer that was asked for
//! JSON but may not comply:
//!
//! 1. Parse the whole answer as a JSON object.
//! 2. Scan backward from the last `{`, parsing one object from each opening
//!    brace, and keep the outermost object that ends last. Prose before and
//!    after the object is ignored. An object followed by `,`, `]` or `}` sat
//!    inside a larger value and is never promoted on its own, so a truncated
//!    answer yields nothing rather than one of its fragments.
//! 3. Otherwise yield an empty mapping. This step never fails.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// How a mapping was obtained from the raw answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovery {
    /// The answer was a well-formed JSON object
    Direct,
    /// The object was cut out of surrounding text
    Extracted,
    /// No object could be read; the mapping is empty
    Empty,
}

impl Recovery {
    /// True when the answer did not conform to the requested format
    pub fn is_degraded(self) -> bool {
        !matches!(self, Recovery::Direct)
    }
}

/// Parse `raw` into a mapping, never failing
pub fn recover_object(raw: &str) -> (Map<String, Value>, Recovery) {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => return (map, Recovery::Direct),
        Ok(other) => debug!("Answer is JSON but not an object ({})", kind(&other)),
        Err(e) => debug!("Direct JSON parse failed: {}", e),
    }

    if let Some(map) = extract_trailing_object(raw) {
        warn!("Recovered JSON object from non-conforming answer");
        return (map, Recovery::Extracted);
    }

    warn!(
        "No JSON object in answer, treating as empty finding. Preview: {}...",
        raw.chars().take(120).collect::<String>()
    );
    (Map::new(), Recovery::Empty)
}

/// Backward scan over opening braces for the last complete top-level object
fn extract_trailing_object(raw: &str) -> Option<Map<String, Value>> {
    let mut best: Option<(usize, Map<String, Value>)> = None;

    for (start, _) in raw.rmatch_indices('{') {
        let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
        if let Some(Ok(Value::Object(map))) = stream.next() {
            let end = start + stream.byte_offset();
            if is_nested(&raw[end..]) {
                continue;
            }
            // Scanning backward: an enclosing object starts earlier and ends no sooner
            let encloses = best.as_ref().is_none_or(|(best_end, _)| end >= *best_end);
            if encloses {
                best = Some((end, map));
            }
        }
    }

    best.map(|(_, map)| map)
}

/// Text after a complete object that can only continue an enclosing value
fn is_nested(rest: &str) -> bool {
    matches!(rest.trim_start().chars().next(), Some(',' | ']' | '}'))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
