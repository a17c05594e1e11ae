//! Structural checks over raw JSON values
//!
//! A small typed parser toolkit: each helper checks one structural rule and
//! reports the violation with JSON-schema phrasing ("is a required property",
//! "is not one of", "is not of type", "Additional properties are not allowed").
//! Callers decide which error kind and context the violation becomes.

use serde_json::{Map, Value};
use thiserror::Error;

/// A single structural violation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SchemaViolation(pub String);

pub type ShapeResult<T> = std::result::Result<T, SchemaViolation>;

/// Render a value the way schema messages quote instances.
pub fn repr(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(repr).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("'{}': {}", k, repr(v)))
                .collect();
            format!("{{{}}}", inner.join(", "))
        }
        other => other.to_string(),
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn not_of_type(value: &Value, expected: &str) -> SchemaViolation {
    SchemaViolation(format!("{} is not of type '{}'", repr(value), expected))
}

pub fn not_one_of(value: &Value, allowed: &[&str]) -> SchemaViolation {
    let allowed: Vec<String> = allowed.iter().map(|a| format!("'{}'", a)).collect();
    SchemaViolation(format!("{} is not one of [{}]", repr(value), allowed.join(", ")))
}

pub fn expect_object<'a>(value: &'a Value) -> ShapeResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| not_of_type(value, "object"))
}

pub fn expect_array<'a>(value: &'a Value) -> ShapeResult<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| not_of_type(value, "array"))
}

pub fn expect_string<'a>(value: &'a Value) -> ShapeResult<&'a str> {
    value.as_str().ok_or_else(|| not_of_type(value, "string"))
}

pub fn expect_bool(value: &Value) -> ShapeResult<bool> {
    value.as_bool().ok_or_else(|| not_of_type(value, "boolean"))
}

/// Any JSON number. Booleans are not numbers.
pub fn expect_number(value: &Value) -> ShapeResult<f64> {
    value.as_f64().ok_or_else(|| not_of_type(value, "number"))
}

/// A JSON number without a fractional representation.
pub fn expect_integer(value: &Value) -> ShapeResult<i64> {
    value.as_i64().ok_or_else(|| not_of_type(value, "integer"))
}

pub fn require<'a>(obj: &'a Map<String, Value>, key: &str) -> ShapeResult<&'a Value> {
    obj.get(key)
        .ok_or_else(|| SchemaViolation(format!("'{}' is a required property", key)))
}

/// Reject keys of `obj` outside `allowed`.
pub fn no_additional_properties(obj: &Map<String, Value>, allowed: &[&str]) -> ShapeResult<()> {
    let unexpected: Vec<String> = obj
        .keys()
        .filter(|k| !allowed.contains(&k.as_str()))
        .map(|k| format!("'{}'", k))
        .collect();
    match unexpected.len() {
        0 => Ok(()),
        1 => Err(SchemaViolation(format!(
            "Additional properties are not allowed ({} was unexpected)",
            unexpected[0]
        ))),
        _ => Err(SchemaViolation(format!(
            "Additional properties are not allowed ({} were unexpected)",
            unexpected.join(", ")
        ))),
    }
}

/// Check an array's length against an exact expected size.
pub fn exact_len(value: &Value, items: &[Value], expected: usize) -> ShapeResult<()> {
    if items.len() < expected {
        Err(SchemaViolation(format!("{} is too short", repr(value))))
    } else if items.len() > expected {
        Err(SchemaViolation(format!("{} is too long", repr(value))))
    } else {
        Ok(())
    }
}
