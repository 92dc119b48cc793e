//! Field decoders for loosely typed stored configs.
//!
//! Older editors wrote numbers as strings (`"3"`, `"2px"`), flags as `"true"`,
//! and occasionally numbers where text belongs. A mistyped field decodes to
//! its default instead of failing the whole block.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A non-negative integer from a number, a float, or a numeric string.
/// Anything unreadable or out of range for `T` is `None`.
pub fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_u64(&value).and_then(|n| T::try_from(n).ok()))
}

/// A boolean from `true`/`false`, `"true"`/`"false"`, or `1`/`0`.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Text from a string; scalars are stringified and `null` is empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(round)),
        Value::String(s) => {
            let s = s.trim().trim_end_matches("px").trim_end();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(round))
        }
        _ => None,
    }
}

fn round(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f <= u64::MAX as f64).then(|| f.round() as u64)
}
