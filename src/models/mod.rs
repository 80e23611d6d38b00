pub mod employer;
pub mod vacancy;

pub use employer::Employer;
pub use vacancy::{Salary, Vacancy};

use serde_json::Value;

use crate::error::AppError;

/// hh.ru serializes identifiers as JSON strings; numeric payloads are
/// accepted too.
fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub(crate) fn require_id(
    value: Option<&Value>,
    entity: &'static str,
    field: &'static str,
) -> Result<i64, AppError> {
    value
        .and_then(parse_id)
        .ok_or(AppError::MissingField { entity, field })
}

pub(crate) fn require_str(
    data: &Value,
    entity: &'static str,
    field: &'static str,
) -> Result<String, AppError> {
    data.get(field)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or(AppError::MissingField { entity, field })
}

/// Optional string field, defaulting to an empty string when absent.
pub(crate) fn str_or_empty(data: &Value, field: &str) -> String {
    data.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Optional string field, absent means None.
pub(crate) fn opt_str(data: &Value, field: &str) -> Option<String> {
    data.get(field).and_then(Value::as_str).map(String::from)
}

/// Unwrap a nested `{"name": ...}` object to its name, None when the
/// object itself is absent.
pub(crate) fn nested_name(data: &Value, field: &str) -> Option<String> {
    data.get(field)
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str)
        .map(String::from)
}
