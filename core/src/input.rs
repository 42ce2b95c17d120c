//! Decoding and normalization of request-body fields.
//!
//! Request messages keep loosely typed fields (`Option<String>`,
//! `Option<serde_json::Value>`) so that validation can report which field is
//! wrong instead of failing the whole body at deserialization time.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Used with `#[serde(default)]` on `Option<Option<T>>` fields: an absent field
/// stays `None`, an explicit `null` becomes `Some(None)`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub fn required_text(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::Missing(field))?;
    bounded_text(field, value, max)
}

pub fn bounded_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > max {
        return Err(ValidationError::Text { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Trims free text; blank text reads as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

pub fn optional_id(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<i32>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v) => integer(v)
            .and_then(|i| i32::try_from(i).ok())
            .map(Some)
            .ok_or_else(|| ValidationError::Invalid(field, "debe ser numérico".to_owned())),
    }
}

pub fn required_id(field: &'static str, value: Option<&Value>) -> Result<i32, ValidationError> {
    optional_id(field, value)?.ok_or(ValidationError::Missing(field))
}

pub fn optional_number(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<f64>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => number(v)
            .map(Some)
            .ok_or_else(|| ValidationError::Invalid(field, "debe ser numérico".to_owned())),
    }
}

/// Dates arrive as `YYYY-MM-DD`; an empty string clears the date.
pub fn optional_date(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match optional_text(value) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ValidationError::Invalid(field, "se espera una fecha AAAA-MM-DD".to_owned())),
    }
}

/// Numbers may be sent as JSON numbers or numeric strings.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Tri-state flag: `true`, `1`, `"1"` are true; `false`, `0`, `"0"` are false;
/// anything else is unknown.
pub fn flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
