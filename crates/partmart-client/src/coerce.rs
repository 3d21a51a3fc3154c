//! Loose coercions over untyped JSON values.
//!
//! The listing API is semi-trusted: any field may be missing, `null`, or of
//! the wrong type. These helpers give every field a well-defined reading so
//! the normalizer never has to fail.

use serde_json::Value;

/// First candidate that is present and not `null`.
#[must_use]
pub fn coalesce<'a>(candidates: &[Option<&'a Value>]) -> Option<&'a Value> {
    candidates.iter().copied().flatten().find(|v| !v.is_null())
}

/// First candidate that is truthy (see [`is_truthy`]).
#[must_use]
pub fn first_truthy<'a>(candidates: &[Option<&'a Value>]) -> Option<&'a Value> {
    candidates.iter().copied().flatten().find(|v| is_truthy(v))
}

/// `false`, `null`, `0`, `NaN` and `""` are falsy; everything else, including
/// empty arrays and objects, is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric reading of a value. Blank strings and `null` read as `0`; text
/// that is not a number, arrays and objects read as `NaN`.
#[must_use]
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Text reading of a value; falsy values read as `""`.
///
/// Integral numbers print without a fractional part, arrays join their
/// elements with `,`, and objects read as `""`.
#[must_use]
pub fn to_text(value: &Value) -> String {
    if is_truthy(value) {
        display_text(value)
    } else {
        String::new()
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Object(_) => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Array(items) => items
            .iter()
            .map(display_text)
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Text of the first truthy candidate, or `""`.
#[must_use]
pub fn text(candidates: &[Option<&Value>]) -> String {
    first_truthy(candidates).map(to_text).unwrap_or_default()
}

/// Text of the first truthy candidate, or `default`.
#[must_use]
pub fn text_or(candidates: &[Option<&Value>], default: &str) -> String {
    let value = text(candidates);
    if value.is_empty() {
        default.to_owned()
    } else {
        value
    }
}

/// String elements of an array value. Non-strings and non-arrays are dropped.
#[must_use]
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Non-negative finite count; `NaN`, infinities and negatives read as `0`.
/// Fractions are truncated and the result saturates at `u64::MAX`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_count(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.trunc() as u64
}
