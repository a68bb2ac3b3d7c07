//! Lenient value coercion.
//!
//! Dataset values arrive as whatever JSON type the producer felt like
//! emitting. These helpers turn them into the record's field types and
//! never fail: anything unusable becomes the field default.

use serde_json::Value;

/// Coerce to a finite, non-negative number.
///
/// Numbers pass through; strings are trimmed and parsed (an empty string is
/// 0). Everything else, and any negative or non-finite result, is 0.
#[must_use]
pub fn to_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => 0.0,
    }
}

/// Coerce to a whole, non-negative count (fractions are truncated).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_count(value: &Value) -> u32 {
    // `as` saturates at u32::MAX; to_number already rules out NaN and negatives.
    to_number(value).trunc() as u32
}

/// Coerce to text. Numbers and booleans are rendered; containers are "".
#[must_use]
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Coerce to a flag: booleans, `"true"` (any case), or a non-zero number.
#[must_use]
pub fn to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}
