//! Lenient deserialization boundary
//!
//! Upstream rows come from generic tables whose JSON metadata columns are
//! free-form and frequently partial. These helpers coerce absent, `null` or
//! mistyped values into defaults exactly once, at deserialization time, so
//! the rest of the crate works with fully typed values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a value, falling back to `T::default()` when it is `null` or
/// does not match the expected shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(T::default());
    }

    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!("Coercing malformed field to default: {}", e);
        T::default()
    }))
}

/// Deserialize a list, dropping entries that do not match `T`.
///
/// Anything other than an array (including `null`) yields an empty list.
pub fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!("Expected a list, found {}; treating as empty", kind(&other));
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Dropping malformed list entry: {}", e);
                None
            }
        })
        .collect())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
