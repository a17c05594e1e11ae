//! Whole-document validation
//!
//! Runs the primitive validators and the dict-field validator over every field
//! of a document and returns the normalized document.

use crate::dict_field::validate_dict;
use crate::mappings::{FieldMapping, Mappings};
use serde_json::Value;
use tensorgate_core::fields::ID_FIELD;
use tensorgate_core::{
    validate_doc, validate_field_content, validate_field_name, validate_id, Document, Error,
    Result, ValidationLimits,
};

/// Per-request context needed to validate documents
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentContext<'a> {
    pub mappings: Option<&'a Mappings>,
    pub non_tensor_fields: &'a [String],
    pub index_model_dimensions: Option<usize>,
}

impl<'a> DocumentContext<'a> {
    pub fn new(mappings: Option<&'a Mappings>, non_tensor_fields: &'a [String]) -> Self {
        Self {
            mappings,
            non_tensor_fields,
            index_model_dimensions: None,
        }
    }

    pub fn with_model_dimensions(mut self, dimensions: usize) -> Self {
        self.index_model_dimensions = Some(dimensions);
        self
    }

    pub fn is_non_tensor_field(&self, field: &str) -> bool {
        self.non_tensor_fields.iter().any(|f| f == field)
    }
}

/// Validate a document and return its normalized form.
///
/// Dict fields are replaced by their normalized content; every other field is
/// returned unchanged. The first failing field aborts validation.
pub fn validate_document(
    doc: &Document,
    ctx: &DocumentContext<'_>,
    limits: &ValidationLimits,
) -> Result<Document> {
    validate_doc(doc, limits)?;

    let mut normalized = Document::new();
    for (name, content) in doc {
        if name == ID_FIELD {
            validate_id(content)?;
            normalized.insert(name.clone(), content.clone());
            continue;
        }

        validate_field_name(name)?;
        let is_non_tensor = ctx.is_non_tensor_field(name);

        let value = match content {
            Value::Object(_) => validate_dict(
                name,
                content,
                is_non_tensor,
                ctx.mappings,
                ctx.index_model_dimensions,
            )?
            .to_value(),
            _ => {
                if let Some(FieldMapping::CustomVector) =
                    ctx.mappings.and_then(|m| m.get(name))
                {
                    return Err(Error::invalid_arg(format!(
                        "The field `{}` is mapped as custom_vector, so its content must be \
                         a dictionary with a `vector`",
                        name
                    )));
                }
                validate_field_content(content, is_non_tensor)?.clone()
            }
        };
        normalized.insert(name.clone(), value);
    }

    tracing::debug!(fields = normalized.len(), "document validated");
    Ok(normalized)
}
