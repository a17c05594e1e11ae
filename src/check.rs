//! Run a single validator over a raw JSON request body

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;
use tensorgate_core::shape::json_type_name;
use tensorgate_core::{
    validate_delete_docs_request, validate_index_name, DeleteDocsRequest, Document, Error, Result,
    ValidationLimits,
};
use tensorgate_index::{default_index_settings, resolve_index_settings, IndexSettings};
use tensorgate_schema::{
    validate_document, validate_mappings_object, DocumentContext, Mappings, ScoreModifier,
    SearchContext,
};

/// The validators reachable from a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// `{documents, mappings?, non_tensor_fields?, index_settings?}`
    Documents,
    Mappings,
    Settings,
    SearchContext,
    ScoreModifiers,
    Delete,
    /// A bare JSON string
    IndexName,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Check::Documents => "documents",
            Check::Mappings => "mappings",
            Check::Settings => "settings",
            Check::SearchContext => "search-context",
            Check::ScoreModifiers => "score-modifiers",
            Check::Delete => "delete",
            Check::IndexName => "index-name",
        };
        f.write_str(name)
    }
}

/// Validate `body` and return its normalized form.
pub fn run_check(check: Check, body: &Value, limits: &ValidationLimits) -> Result<Value> {
    tracing::debug!(%check, "running check");
    match check {
        Check::Documents => check_documents(body, limits),
        Check::Mappings => to_json(&validate_mappings_object(body)?),
        Check::Settings => to_json(&resolve_index_settings(body, limits)?),
        Check::SearchContext => to_json(&SearchContext::from_json(body)?),
        Check::ScoreModifiers => to_json(&ScoreModifier::from_json(body)?),
        Check::Delete => {
            let request = DeleteDocsRequest::from_json(body)?;
            to_json(&validate_delete_docs_request(request, None, limits)?)
        }
        Check::IndexName => match body.as_str() {
            Some(name) => Ok(Value::String(validate_index_name(name)?.to_string())),
            None => Err(Error::Contract(format!(
                "index name must be a JSON string, found {}",
                json_type_name(body)
            ))),
        },
    }
}

/// Result of one document in an add-documents body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DocumentOutcome {
    Accepted { status: u16, document: Document },
    Rejected { status: u16, code: &'static str, error: String },
}

impl DocumentOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, DocumentOutcome::Rejected { .. })
    }
}

/// Validate every document of an add-documents body.
///
/// Request-level problems (mappings, settings) fail the whole call; a bad
/// document only rejects itself.
pub fn validate_documents(body: &Value, limits: &ValidationLimits) -> Result<Vec<DocumentOutcome>> {
    let Some(request) = body.as_object() else {
        return Err(Error::invalid_arg(format!(
            "add documents body must be an object, found {}",
            json_type_name(body)
        )));
    };
    let Some(documents) = request.get("documents").and_then(Value::as_array) else {
        return Err(Error::invalid_arg("`documents` must be a list of documents"));
    };

    let mappings = match request.get("mappings") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(validate_mappings_object(raw)?),
    };
    let non_tensor_fields = string_list(request.get("non_tensor_fields"))?;
    let settings = match request.get("index_settings") {
        None | Some(Value::Null) => default_index_settings(),
        Some(raw) => resolve_index_settings(raw, limits)?,
    };
    let dimensions = model_dimensions(&settings, mappings.as_ref())?;

    let mut ctx = DocumentContext::new(mappings.as_ref(), &non_tensor_fields);
    if let Some(dimensions) = dimensions {
        ctx = ctx.with_model_dimensions(dimensions);
    }

    let outcomes: Vec<DocumentOutcome> = documents
        .iter()
        .map(|doc| document_outcome(doc, &ctx, limits))
        .collect();

    let rejected = outcomes.iter().filter(|o| o.is_rejected()).count();
    if rejected > 0 {
        tracing::warn!(rejected, total = outcomes.len(), "documents rejected");
    }
    Ok(outcomes)
}

fn document_outcome(doc: &Value, ctx: &DocumentContext<'_>, limits: &ValidationLimits) -> DocumentOutcome {
    let result = match doc.as_object() {
        Some(doc) => validate_document(doc, ctx, limits),
        None => Err(Error::invalid_arg(format!(
            "Docs must be dicts, found {}",
            json_type_name(doc)
        ))),
    };
    match result {
        Ok(document) => DocumentOutcome::Accepted { status: 200, document },
        Err(e) => DocumentOutcome::Rejected {
            status: e.status_code(),
            code: e.code(),
            error: e.message().to_string(),
        },
    }
}

/// Model dimensions are only needed when custom vectors are mapped.
fn model_dimensions(settings: &IndexSettings, mappings: Option<&Mappings>) -> Result<Option<usize>> {
    let needs_dimensions = mappings.is_some_and(|m| m.custom_vector_fields().next().is_some());
    if needs_dimensions {
        settings.model_dimensions().map(Some)
    } else {
        Ok(None)
    }
}

fn string_list(raw: Option<&Value>) -> Result<Vec<String>> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::invalid_arg("`non_tensor_fields` must be a list of strings")
                })
            })
            .collect(),
        Some(_) => Err(Error::invalid_arg("`non_tensor_fields` must be a list of strings")),
    }
}

fn check_documents(body: &Value, limits: &ValidationLimits) -> Result<Value> {
    let outcomes = validate_documents(body, limits)?;
    let errors = outcomes.iter().any(DocumentOutcome::is_rejected);
    let mut out = Map::new();
    out.insert("errors".to_string(), Value::Bool(errors));
    out.insert("items".to_string(), to_json(&outcomes)?);
    Ok(Value::Object(out))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| Error::internal(format!("could not serialize validated value: {}", e)))
}

/// Shape of an error as printed by the command line
pub fn error_body(error: &Error) -> Value {
    json!({
        "code": error.code(),
        "status": error.status_code(),
        "message": error.message(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_mixed_outcomes() {
        let body = json!({
            "documents": [
                {"_id": "1", "title": "ok"},
                {"_id": "2", "__vector_title": "bad"},
                "not a dict"
            ]
        });
        let outcomes = validate_documents(&body, &ValidationLimits::default()).unwrap();
        assert!(!outcomes[0].is_rejected());
        match &outcomes[1] {
            DocumentOutcome::Rejected { status, code, .. } => {
                assert_eq!(*status, 400);
                assert_eq!(*code, "invalid_field_name");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(outcomes[2].is_rejected());
    }

    #[test]
    fn test_custom_vectors_use_model_dimensions() {
        let body = json!({
            "documents": [{"_id": "1", "v": {"vector": [0.5, 0.5, 0.5]}}],
            "mappings": {"v": {"type": "custom_vector"}},
            "index_settings": {"index_defaults": {"model": "no_model", "model_properties": {"dimensions": 3}}}
        });
        let outcomes = validate_documents(&body, &ValidationLimits::default()).unwrap();
        assert!(!outcomes[0].is_rejected(), "{:?}", outcomes);
    }

    #[test]
    fn test_request_level_errors() {
        let limits = ValidationLimits::default();
        assert!(validate_documents(&json!([]), &limits).is_err());
        assert!(validate_documents(&json!({"documents": {}}), &limits).is_err());
        assert!(validate_documents(
            &json!({"documents": [], "mappings": {"f": {"type": "nope"}}}),
            &limits
        )
        .is_err());
        assert!(validate_documents(&json!({"documents": [], "non_tensor_fields": [1]}), &limits).is_err());
    }

    #[test]
    fn test_index_name_check() {
        let limits = ValidationLimits::default();
        assert_eq!(
            run_check(Check::IndexName, &json!("my-index"), &limits).unwrap(),
            json!("my-index")
        );
        assert!(matches!(
            run_check(Check::IndexName, &json!(".kibana"), &limits),
            Err(Error::InvalidIndexName(_))
        ));
        assert!(matches!(
            run_check(Check::IndexName, &json!(5), &limits),
            Err(Error::Contract(_))
        ));
    }

    #[test]
    fn test_error_body() {
        let body = error_body(&Error::DocTooLarge("too big".to_string()));
        assert_eq!(body, json!({"code": "doc_too_large", "status": 413, "message": "too big"}));
    }
}
