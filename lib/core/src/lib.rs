//! # tensorgate Core
//!
//! Core library for the tensorgate validation layer.
//!
//! This crate provides the building blocks every other tensorgate crate uses:
//!
//! - [`Error`] - the error kinds a validator can fail with
//! - [`ValidationLimits`] - size and count limits read from the environment
//! - [`fields`] - reserved field names, prefixes and index names
//! - [`shape`] - JSON-schema style structural checks over raw JSON
//! - Primitive validators for field names, vector names, content, documents and ids
//! - [`DeleteDocsRequest`] validation
//!
//! ## Example
//!
//! ```rust
//! use tensorgate_core::{validate_doc, validate_field_name, Document, ValidationLimits};
//! use serde_json::json;
//!
//! let limits = ValidationLimits::default();
//! let mut doc = Document::new();
//! doc.insert("title".to_string(), json!("Hello"));
//!
//! validate_doc(&doc, &limits).unwrap();
//! for name in doc.keys() {
//!     validate_field_name(name).unwrap();
//! }
//! assert!(validate_field_name("__vector_title").is_err());
//! ```

pub mod error;
pub mod fields;
pub mod limits;
pub mod shape;
pub mod validation;
pub mod delete;

pub use error::{Error, Result};
pub use limits::ValidationLimits;
pub use shape::SchemaViolation;
pub use validation::{
    validate_doc, validate_field_content, validate_field_name, validate_field_name_value,
    validate_id, validate_index_name, validate_str_against_enum, validate_vector_name,
    validate_vector_name_value, Document,
};
pub use delete::{validate_delete_docs_request, DeleteDocsRequest};
