//! Turns raw model text into a [`StructuredResult`].
//!
//! Parsing is two-staged: the whole reply as JSON, then the widest
//! brace-delimited span inside it. Whatever parses is then coerced into the
//! minutes schema and trimmed to the sections the request asked for.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{MinutesError, Result};
use crate::minutes::request::RequestConfig;
use crate::minutes::schema::{SchemaVariant, StructuredResult};

/// First `{` through last `}`, across lines
static JSON_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("Invalid regex"));

/// Fields the request owns; whatever the model echoes for them is dropped.
const REQUEST_ECHO_FIELDS: [&str; 2] = ["meeting_title", "meeting_date"];

#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// The reply was JSON as-is
    Strict(Value),
    /// JSON was recovered from surrounding prose or fences
    Salvaged(Value),
}

impl ParseOutcome {
    pub fn into_value(self) -> Value {
        match self {
            Self::Strict(v) | Self::Salvaged(v) => v,
        }
    }

    pub fn is_salvaged(&self) -> bool {
        matches!(self, Self::Salvaged(_))
    }
}

pub fn parse_model_output(raw: &str) -> Result<ParseOutcome> {
    let strict_err = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) => return Ok(ParseOutcome::Strict(value)),
        Err(e) => e,
    };

    let span = JSON_SPAN_RE
        .find(raw)
        .ok_or_else(|| MinutesError::UnparsableOutput {
            raw: raw.to_string(),
            reason: format!("no JSON object found ({})", strict_err),
        })?;

    serde_json::from_str::<Value>(span.as_str())
        .map(ParseOutcome::Salvaged)
        .map_err(|e| MinutesError::UnparsableOutput {
            raw: raw.to_string(),
            reason: format!("extracted object is not valid JSON: {}", e),
        })
}

/// Coerce a parsed reply into the schema for `variant`. Missing or null
/// fields take their empty form; suppressed sections are discarded unread.
pub fn into_schema(value: Value, variant: SchemaVariant) -> Result<StructuredResult> {
    let mut fields = match value {
        Value::Object(map) => map,
        other => {
            return Err(MinutesError::NotSerializable(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    for key in REQUEST_ECHO_FIELDS {
        fields.remove(key);
    }
    if !variant.timeline {
        fields.remove("timeline");
    }
    if !variant.sentiment {
        fields.remove("speaker_sentiment");
    }
    let fields: Map<String, Value> = fields.into_iter().filter(|(_, v)| !v.is_null()).collect();

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| MinutesError::NotSerializable(e.to_string()))
}

pub fn reconcile(
    raw: &str,
    request: &RequestConfig,
    variant: SchemaVariant,
) -> Result<StructuredResult> {
    let outcome = parse_model_output(raw)?;
    if outcome.is_salvaged() {
        tracing::warn!("Model reply was not pure JSON, recovered embedded object");
    } else {
        tracing::debug!("Model reply parsed as strict JSON");
    }

    let mut result = into_schema(outcome.into_value(), variant)?;
    result.enforce(request, variant);
    Ok(result)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
