//! # tensorgate
//!
//! Input validation and schema normalization for tensor search APIs.
//!
//! Every document, index configuration, search context, score modifier and
//! delete request passes through tensorgate before it reaches the search
//! backend or the embedding pipeline. Each validator either returns a
//! normalized, well-formed value or a precise user-facing [`Error`].
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! tensorgate settings index_settings.json
//! tensorgate documents add_documents.json --log-level debug
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use tensorgate::prelude::*;
//! use serde_json::json;
//!
//! let limits = ValidationLimits::default();
//! let settings = resolve_index_settings(&json!({}), &limits).unwrap();
//!
//! let mappings = Mappings::from_json(&json!({"v": {"type": "custom_vector"}})).unwrap();
//! let non_tensor: Vec<String> = Vec::new();
//! let ctx = DocumentContext::new(Some(&mappings), &non_tensor)
//!     .with_model_dimensions(settings.model_dimensions().unwrap());
//!
//! let doc = json!({"_id": "1", "v": {"vector": vec![0.0; 384]}});
//! let normalized = validate_document(doc.as_object().unwrap(), &ctx, &limits).unwrap();
//! assert_eq!(normalized["v"]["content"], "");
//! ```
//!
//! ## Crate Structure
//!
//! - [`tensorgate-core`](https://docs.rs/tensorgate-core) - errors, limits, reserved names, primitive validators, delete requests
//! - [`tensorgate-schema`](https://docs.rs/tensorgate-schema) - mappings, dict fields, documents, search contexts, score modifiers
//! - [`tensorgate-index`](https://docs.rs/tensorgate-index) - index settings, ANN parameters, model registry, index info

pub mod check;
pub mod input;

// Re-export core types
pub use tensorgate_core::{
    validate_delete_docs_request, validate_doc, validate_field_content, validate_field_name,
    validate_id, validate_index_name, validate_str_against_enum, validate_vector_name,
    DeleteDocsRequest, Document, Error, Result, ValidationLimits,
};

// Re-export schema validation
pub use tensorgate_schema::{
    validate_boost, validate_dict, validate_document, validate_mappings_object,
    validate_searchable_attributes, DictFieldContent, DocumentContext, FieldMapping, Mappings,
    ScoreModifier, SearchContext, SearchMethod,
};

// Re-export index configuration
pub use tensorgate_index::{
    default_ann_parameters, default_index_settings, resolve_index_settings,
    validate_settings_object, AnnParameters, IndexInfo, IndexSettings, ModelProperties,
};

pub use check::{run_check, Check};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        resolve_index_settings, validate_delete_docs_request, validate_document,
        validate_field_name, validate_index_name, DeleteDocsRequest, Document, DocumentContext,
        Error, IndexInfo, IndexSettings, Mappings, Result, ScoreModifier, SearchContext,
        SearchMethod, ValidationLimits,
    };
}

/// Reserved field and index names
pub mod fields {
    pub use tensorgate_core::fields::*;
}
