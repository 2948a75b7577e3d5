//! JSON helpers shared by detection and import

use serde_json::{Map, Number, Value};

/// JavaScript-style truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether `value` is an object whose `field` is an array
pub fn has_array(value: &Value, field: &str) -> bool {
    value.get(field).is_some_and(Value::is_array)
}

/// Whether `value` is an object whose `field` is an object
pub fn has_object(value: &Value, field: &str) -> bool {
    value.get(field).is_some_and(Value::is_object)
}

/// Normalize an identity field for comparison.
///
/// Strings and numbers compare by their textual form so `"7"` and `7` match.
/// Integral floats render without a fraction, so `1.0` and `1` match too.
/// Missing, null and structured values have no identity.
pub fn identity_key(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// 2^53, the largest range where every integer is exactly representable
const MAX_SAFE_FLOAT: f64 = 9_007_199_254_740_992.0;

fn number_key(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < MAX_SAFE_FLOAT => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Case-insensitive identity for name-keyed records
pub fn name_key(value: Option<&Value>) -> Option<String> {
    value?.as_str().map(str::to_lowercase)
}

/// Shallow overlay: every top-level field of `incoming` replaces the field in `target`.
///
/// Non-object targets are replaced wholesale.
pub fn overlay(target: &mut Value, incoming: &Value) {
    match (target.as_object_mut(), incoming.as_object()) {
        (Some(existing), Some(fields)) => {
            for (key, value) in fields {
                existing.insert(key.clone(), value.clone());
            }
        }
        _ => *target = incoming.clone(),
    }
}

/// `{...existing, ...incoming}` for two optional objects
pub fn merged_object(existing: Option<&Value>, incoming: Option<&Value>) -> Value {
    let mut merged = existing
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);
    if let Some(fields) = incoming.and_then(Value::as_object) {
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}
