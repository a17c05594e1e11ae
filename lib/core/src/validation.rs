//! Primitive validators
//!
//! Field names, vector names, field content, whole documents, ids and index
//! names. Each validator returns its input unchanged on success so calls can
//! be chained with `?`.

use crate::fields::{
    self, CHUNK_NESTING_PATTERN, RESERVED_INDEX_NAMES, RESERVED_INDEX_PREFIXES, VECTOR_PREFIX,
};
use crate::limits::ValidationLimits;
use crate::shape::{json_type_name, repr};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// A document as received from the caller: field name to field content.
pub type Document = Map<String, Value>;

/// Validate a user-supplied field name.
pub fn validate_field_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::InvalidFieldName("field name can't be empty!".to_string()));
    }
    if name.starts_with(VECTOR_PREFIX) {
        return Err(Error::InvalidFieldName(format!(
            "can't start field name with protected prefix {}. Error raised for field name: {}",
            VECTOR_PREFIX, name
        )));
    }
    if fields::is_protected(name) {
        return Err(Error::InvalidFieldName(format!(
            "field name can't be a protected field. Please rename this field: {}",
            name
        )));
    }
    if name.contains(CHUNK_NESTING_PATTERN) {
        return Err(Error::InvalidFieldName(format!(
            "field name can't contain the nested chunk pattern `{}`. Error raised for field name: {}",
            CHUNK_NESTING_PATTERN, name
        )));
    }
    Ok(name)
}

/// Like [`validate_field_name`] but accepts any JSON value, reporting non-strings.
pub fn validate_field_name_value(name: &Value) -> Result<&str> {
    match name {
        Value::Null => Err(Error::InvalidFieldName("field name can't be empty!".to_string())),
        Value::String(s) => validate_field_name(s),
        other => Err(Error::InvalidFieldName(format!(
            "field name must be str! Found type {} for {}",
            json_type_name(other),
            repr(other)
        ))),
    }
}

/// Validate a system-generated vector property name.
///
/// Failures are internal errors: these names never come from users.
pub fn validate_vector_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::internal("vector name can't be empty!"));
    }
    let Some(unprefixed) = name.strip_prefix(VECTOR_PREFIX) else {
        return Err(Error::internal(format!(
            "names of vectors must begin with the vector prefix ({})! Found vector name: {}",
            VECTOR_PREFIX, name
        )));
    };
    if unprefixed.is_empty() {
        return Err(Error::internal(format!(
            "vector name without its prefix can't be empty! Found vector name: {}",
            name
        )));
    }
    if fields::is_system_field(unprefixed) {
        return Err(Error::internal(format!(
            "vector name without its prefix can't be a protected name. Found vector name: {}",
            name
        )));
    }
    Ok(name)
}

pub fn validate_vector_name_value(name: &Value) -> Result<&str> {
    match name {
        Value::String(s) => validate_vector_name(s),
        other => Err(Error::internal(format!(
            "vector name must be str! Found type {} for {}",
            json_type_name(other),
            repr(other)
        ))),
    }
}

/// Validate a non-dict field's content.
///
/// Scalars always pass. Lists pass only for non-tensor fields and only when
/// every element is a string.
pub fn validate_field_content(content: &Value, is_non_tensor_field: bool) -> Result<&Value> {
    match content {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(content),
        Value::Array(items) => {
            if !is_non_tensor_field {
                return Err(Error::invalid_arg(format!(
                    "Field content {} is a list, which is only allowed for non-tensor fields",
                    repr(content)
                )));
            }
            match items.iter().find(|item| !item.is_string()) {
                None => Ok(content),
                Some(bad) => Err(Error::invalid_arg(format!(
                    "Field content {} contains {} of type {}. Lists may only contain strings",
                    repr(content),
                    repr(bad),
                    json_type_name(bad)
                ))),
            }
        }
        Value::Null | Value::Object(_) => Err(Error::invalid_arg(format!(
            "Field content {} is not of valid content type! Allowed content types: \
             string, number, boolean, list of strings (non-tensor fields only)",
            repr(content)
        ))),
    }
}

/// Validate a whole document: non-empty and within the byte ceiling.
///
/// The size is the length of the compact JSON serialization; a document of
/// exactly `max_doc_bytes` bytes is accepted.
pub fn validate_doc<'a>(doc: &'a Document, limits: &ValidationLimits) -> Result<&'a Document> {
    if doc.is_empty() {
        return Err(Error::invalid_arg("Can't index an empty dict."));
    }
    let size = serde_json::to_vec(doc)
        .map_err(|e| Error::internal(format!("document could not be serialized: {}", e)))?
        .len();
    if size > limits.max_doc_bytes {
        tracing::debug!(size, max = limits.max_doc_bytes, "document rejected for size");
        return Err(Error::DocTooLarge(format!(
            "Document exceeds the maximum allowed size of {} bytes (found {} bytes). \
             The limit can be changed with MARQO_MAX_DOC_BYTES",
            limits.max_doc_bytes, size
        )));
    }
    Ok(doc)
}

/// Validate a document id: a non-empty string.
pub fn validate_id(value: &Value) -> Result<&str> {
    match value.as_str() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(Error::InvalidDocumentId(format!(
            "Document _id must be a non-empty string. Received: {}",
            repr(value)
        ))),
    }
}

/// Reject names that collide with system or reserved indices.
pub fn validate_index_name(name: &str) -> Result<&str> {
    let reserved = RESERVED_INDEX_NAMES.contains(&name)
        || RESERVED_INDEX_PREFIXES.iter().any(|p| name.starts_with(p));
    if reserved {
        return Err(Error::InvalidIndexName(format!(
            "{} is a reserved index name and can't be used",
            name
        )));
    }
    Ok(name)
}

/// Check `value` against a fixed set of allowed strings.
///
/// Case-insensitive matching still returns `value` in its original casing.
pub fn validate_str_against_enum<'a>(
    value: &'a str,
    allowed: &[&str],
    case_sensitive: bool,
) -> Result<&'a str> {
    let matched = if case_sensitive {
        allowed.contains(&value)
    } else {
        let lowered = value.to_lowercase();
        allowed.iter().any(|a| a.to_lowercase() == lowered)
    };
    if matched {
        Ok(value)
    } else {
        Err(Error::InvalidValue(format!(
            "{} is not a valid value, expected one of {:?}",
            value, allowed
        )))
    }
}
