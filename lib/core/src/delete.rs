//! Batch document deletion requests

use crate::limits::ValidationLimits;
use crate::shape::{json_type_name, repr};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request to delete documents by id.
///
/// `document_ids` is kept as raw JSON: its shape is what validation checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteDocsRequest {
    pub index_name: String,
    pub document_ids: Value,
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,
}

fn default_auto_refresh() -> bool {
    true
}

impl DeleteDocsRequest {
    pub fn new(index_name: impl Into<String>, document_ids: Value, auto_refresh: bool) -> Self {
        Self {
            index_name: index_name.into(),
            document_ids,
            auto_refresh,
        }
    }

    /// Build a request from a JSON body.
    ///
    /// Anything other than an object with the expected fields is a caller
    /// contract violation, not a user error.
    pub fn from_json(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::Contract(format!(
                "delete request must be an object, found {}",
                json_type_name(value)
            )));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| Error::Contract(format!("malformed delete request: {}", e)))
    }

    /// The requested ids, once the request has been validated.
    pub fn ids(&self) -> Vec<&str> {
        self.document_ids
            .as_array()
            .map(|ids| ids.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Validate a delete request against count and id rules.
///
/// `max_count = None` means the configured system maximum, not "unlimited".
pub fn validate_delete_docs_request(
    request: DeleteDocsRequest,
    max_count: Option<usize>,
    limits: &ValidationLimits,
) -> Result<DeleteDocsRequest> {
    let max_count = max_count.unwrap_or(limits.max_delete_docs_count);

    let ids = match &request.document_ids {
        Value::Array(ids) => ids,
        other => {
            return Err(Error::invalid_arg(format!(
                "document_ids must be a list of strings, found {}",
                json_type_name(other)
            )))
        }
    };

    if ids.is_empty() {
        return Err(Error::InvalidDocumentId(
            "can't delete an empty list of document_ids".to_string(),
        ));
    }

    if ids.len() > max_count {
        return Err(Error::invalid_arg(format!(
            "The number of documents to delete ({}) exceeds the maximum allowed ({}). \
             The limit can be changed with MARQO_MAX_DELETE_DOCS_COUNT",
            ids.len(),
            max_count
        )));
    }

    for id in ids {
        match id.as_str() {
            Some(s) if !s.is_empty() => {}
            _ => {
                return Err(Error::InvalidDocumentId(format!(
                    "document ids must be non-empty strings, found {}",
                    repr(id)
                )))
            }
        }
    }

    Ok(request)
}
