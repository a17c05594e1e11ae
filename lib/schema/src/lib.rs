//! # tensorgate Schema
//!
//! Document and search-request schema validation.
//!
//! ## Overview
//!
//! Documents may carry dict-valued fields whose shape is declared up front in a
//! `mappings` object. This crate parses that object into typed [`Mappings`],
//! validates dict fields against it, and validates whole documents. It also
//! owns the structured search parameters: search contexts, score modifiers,
//! searchable attributes and boost.
//!
//! ## Example
//!
//! ```rust
//! use tensorgate_schema::{validate_document, DocumentContext, Mappings};
//! use tensorgate_core::ValidationLimits;
//! use serde_json::json;
//!
//! let mappings = Mappings::from_json(&json!({
//!     "combo": {"type": "multimodal_combination", "weights": {"text": 0.6, "image": 0.4}}
//! }))
//! .unwrap();
//!
//! let doc = json!({"_id": "1", "combo": {"text": "a cat", "image": "https://x.y/cat.png"}});
//! let ctx = DocumentContext::new(Some(&mappings), &[]);
//! let normalized = validate_document(doc.as_object().unwrap(), &ctx, &ValidationLimits::default()).unwrap();
//! assert_eq!(normalized["_id"], "1");
//! ```

pub mod mappings;
pub mod dict_field;
pub mod document;
pub mod search_context;
pub mod score_modifier;
pub mod query;

// Re-export main types
pub use mappings::{
    validate_custom_vector_mappings_object, validate_mappings_object,
    validate_multimodal_combination_mappings_object, FieldMapping, Mappings,
};
pub use dict_field::{validate_dict, DictFieldContent};
pub use document::{validate_document, DocumentContext};
pub use search_context::{SearchContext, WeightedVector};
pub use score_modifier::{ScoreModifier, ScoreModifierField};
pub use query::{validate_boost, validate_searchable_attributes, SearchMethod};
