//! # tensorgate Index
//!
//! Index configuration: settings defaults and validation, ANN parameter
//! resolution, the built-in model registry, text preprocessing and the
//! [`IndexInfo`] accessor over persisted index metadata.
//!
//! ```rust
//! use tensorgate_index::{resolve_index_settings, IndexInfo};
//! use tensorgate_core::ValidationLimits;
//! use serde_json::{json, Map};
//!
//! let settings = resolve_index_settings(
//!     &json!({"index_defaults": {"ann_parameters": {"parameters": {"m": 24}}}}),
//!     &ValidationLimits::default(),
//! )
//! .unwrap();
//!
//! let info = IndexInfo::from_settings(Map::new(), settings);
//! let ann = info.get_ann_parameters();
//! assert_eq!(ann.name, "hnsw");
//! assert_eq!(ann.parameters["m"], 24);
//! assert_eq!(ann.parameters["ef_construction"], 128);
//! ```

pub mod ann;
pub mod index_info;
pub mod models;
pub mod preprocessing;
pub mod settings;

pub use ann::{default_ann_parameters, resolve_ann_parameters, AnnParameters, AnnParametersOverride};
pub use index_info::IndexInfo;
pub use models::ModelProperties;
pub use preprocessing::{prefix_text_chunks, split_text, SplitMethod};
pub use settings::{
    autofill_index_settings, default_index_settings, resolve_index_settings,
    validate_model_name_and_properties, validate_model_properties_no_model,
    validate_settings_object, IndexDefaults, IndexSettings, ImagePreprocessing, TextPreprocessing,
};
