//! Index settings
//!
//! Settings are nested: `index_defaults` carries the model configuration and
//! the preprocessing blocks, while shard and replica counts live at the root.
//! Structural keys are only accepted at their own level; the same key found
//! anywhere else is reported as misplaced. Unknown keys inside the two
//! preprocessing blocks are kept as extension points.

use crate::ann::{parse_ann_parameters, resolve_ann_parameters, AnnParameters, AnnParametersOverride};
use crate::models::{self, ModelProperties, NO_MODEL};
use crate::preprocessing::SplitMethod;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tensorgate_core::shape::{
    expect_bool, expect_integer, expect_object, expect_string, no_additional_properties,
    not_one_of, require, ShapeResult,
};
use tensorgate_core::{Error, Result, SchemaViolation, ValidationLimits};

pub const INDEX_DEFAULTS: &str = "index_defaults";
pub const NUMBER_OF_SHARDS: &str = "number_of_shards";
pub const NUMBER_OF_REPLICAS: &str = "number_of_replicas";

pub const MODEL: &str = "model";
pub const MODEL_PROPERTIES: &str = "model_properties";
pub const SEARCH_MODEL: &str = "search_model";
pub const SEARCH_MODEL_PROPERTIES: &str = "search_model_properties";
pub const NORMALIZE_EMBEDDINGS: &str = "normalize_embeddings";
pub const TREAT_URLS_AND_POINTERS_AS_IMAGES: &str = "treat_urls_and_pointers_as_images";
pub const TEXT_PREPROCESSING: &str = "text_preprocessing";
pub const IMAGE_PREPROCESSING: &str = "image_preprocessing";
pub const ANN_PARAMETERS: &str = "ann_parameters";

pub const SPLIT_LENGTH: &str = "split_length";
pub const SPLIT_OVERLAP: &str = "split_overlap";
pub const SPLIT_METHOD: &str = "split_method";
pub const OVERRIDE_TEXT_CHUNK_PREFIX: &str = "override_text_chunk_prefix";
pub const OVERRIDE_TEXT_QUERY_PREFIX: &str = "override_text_query_prefix";

pub const PATCH_METHOD: &str = "patch_method";

pub const DEFAULT_MODEL: &str = "hf/all_datasets_v4_MiniLM-L6";

const ROOT_KEYS: &[&str] = &[INDEX_DEFAULTS, NUMBER_OF_SHARDS, NUMBER_OF_REPLICAS];
const INDEX_DEFAULTS_KEYS: &[&str] = &[
    MODEL,
    MODEL_PROPERTIES,
    SEARCH_MODEL,
    SEARCH_MODEL_PROPERTIES,
    NORMALIZE_EMBEDDINGS,
    TREAT_URLS_AND_POINTERS_AS_IMAGES,
    TEXT_PREPROCESSING,
    IMAGE_PREPROCESSING,
    ANN_PARAMETERS,
];
const TEXT_PREPROCESSING_KEYS: &[&str] = &[
    SPLIT_LENGTH,
    SPLIT_OVERLAP,
    SPLIT_METHOD,
    OVERRIDE_TEXT_CHUNK_PREFIX,
    OVERRIDE_TEXT_QUERY_PREFIX,
];
const IMAGE_PREPROCESSING_KEYS: &[&str] = &[PATCH_METHOD];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSettings {
    pub index_defaults: IndexDefaults,
    pub number_of_shards: u64,
    pub number_of_replicas: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefaults {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_properties: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_model_properties: Option<Map<String, Value>>,
    pub normalize_embeddings: bool,
    pub treat_urls_and_pointers_as_images: bool,
    pub text_preprocessing: TextPreprocessing,
    pub image_preprocessing: ImagePreprocessing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ann_parameters: Option<AnnParametersOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPreprocessing {
    pub split_length: u64,
    pub split_overlap: u64,
    pub split_method: SplitMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_text_chunk_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_text_query_prefix: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextPreprocessing {
    pub fn split(&self, text: &str) -> Vec<String> {
        crate::preprocessing::split_text(
            text,
            self.split_method,
            usize::try_from(self.split_length).unwrap_or(usize::MAX),
            usize::try_from(self.split_overlap).unwrap_or(usize::MAX),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePreprocessing {
    pub patch_method: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IndexSettings {
    /// ANN parameters with every omitted value filled from the defaults.
    pub fn ann_parameters(&self) -> AnnParameters {
        resolve_ann_parameters(self.index_defaults.ann_parameters.as_ref())
    }

    /// Properties of the indexing model.
    pub fn get_model_properties(&self) -> Result<ModelProperties> {
        models::resolve_model_properties(
            &self.index_defaults.model,
            self.index_defaults.model_properties.as_ref(),
        )
    }

    /// Properties of the search model.
    ///
    /// Fails with an internal error when the index has no search model.
    pub fn get_search_model_properties(&self) -> Result<ModelProperties> {
        let Some(search_model) = self.index_defaults.search_model.as_deref() else {
            return Err(missing_search_model());
        };
        models::resolve_model_properties(
            search_model,
            self.index_defaults.search_model_properties.as_ref(),
        )
    }

    pub fn model_dimensions(&self) -> Result<usize> {
        self.get_model_properties()?.require_dimensions()
    }
}

pub(crate) fn missing_search_model() -> Error {
    Error::internal("Cannot get `search_model_properties` when `search_model` does not exist.")
}

fn default_settings_value() -> Value {
    json!({
        INDEX_DEFAULTS: {
            TREAT_URLS_AND_POINTERS_AS_IMAGES: false,
            MODEL: DEFAULT_MODEL,
            NORMALIZE_EMBEDDINGS: true,
            TEXT_PREPROCESSING: {
                SPLIT_LENGTH: 2,
                SPLIT_OVERLAP: 0,
                SPLIT_METHOD: "sentence"
            },
            IMAGE_PREPROCESSING: {
                PATCH_METHOD: null
            },
            ANN_PARAMETERS: crate::ann::default_ann_parameters()
        },
        NUMBER_OF_SHARDS: 5,
        NUMBER_OF_REPLICAS: 1
    })
}

/// System default settings
pub fn default_index_settings() -> IndexSettings {
    let ann = crate::ann::default_ann_parameters();
    IndexSettings {
        index_defaults: IndexDefaults {
            model: DEFAULT_MODEL.to_string(),
            model_properties: None,
            search_model: None,
            search_model_properties: None,
            normalize_embeddings: true,
            treat_urls_and_pointers_as_images: false,
            text_preprocessing: TextPreprocessing {
                split_length: 2,
                split_overlap: 0,
                split_method: SplitMethod::Sentence,
                override_text_chunk_prefix: None,
                override_text_query_prefix: None,
                extra: Map::new(),
            },
            image_preprocessing: ImagePreprocessing {
                patch_method: None,
                extra: Map::new(),
            },
            ann_parameters: Some(AnnParametersOverride::from(&ann)),
        },
        number_of_shards: 5,
        number_of_replicas: 1,
    }
}

/// Merge user settings over the system defaults.
///
/// Nested objects are merged key by key; any non-object user value replaces
/// the default outright. A non-object input is returned unchanged so that
/// validation can report it.
pub fn autofill_index_settings(settings: &Value) -> Value {
    if !settings.is_object() {
        return settings.clone();
    }
    let mut filled = default_settings_value();
    merge(&mut filled, settings);
    filled
}

fn merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Structural validation of a complete settings object.
///
/// Idempotent: serializing the result reproduces a canonical input.
pub fn validate_settings_object(settings: &Value, limits: &ValidationLimits) -> Result<IndexSettings> {
    parse_settings(settings, limits).map_err(|v| {
        Error::invalid_arg(format!("Error validating index settings object. Reason: {}", v))
    })
}

/// Cross-field model rules, checked on the settings as the user sent them.
pub fn validate_model_name_and_properties(settings: &Value) -> Result<()> {
    let Some(defaults) = settings.get(INDEX_DEFAULTS).and_then(Value::as_object) else {
        return Ok(());
    };
    let has = |key: &str| defaults.get(key).is_some_and(|v| !v.is_null());

    if has(MODEL_PROPERTIES) && !has(MODEL) {
        return Err(Error::invalid_arg(
            "No `model` found for model_properties. Specify `model` alongside `model_properties`",
        ));
    }
    if has(SEARCH_MODEL) && !has(MODEL) {
        return Err(Error::invalid_arg(
            "`search_model` cannot be specified without also specifying `model`",
        ));
    }
    if has(SEARCH_MODEL_PROPERTIES) && !has(SEARCH_MODEL) {
        return Err(Error::invalid_arg(
            "No `search_model` found for search_model_properties. \
             Specify `search_model` alongside `search_model_properties`",
        ));
    }
    Ok(())
}

/// Rules for `model_properties` when the index model is `no_model`.
///
/// Only `dimensions` may be given, and it must be.
pub fn validate_model_properties_no_model(model_properties: Option<&Value>) -> Result<()> {
    let properties = match model_properties {
        Some(Value::Object(properties)) => properties,
        Some(Value::Null) | None => {
            return Err(Error::invalid_arg(format!(
                "When model is `{}`, you must provide `model_properties` with `dimensions` set",
                NO_MODEL
            )))
        }
        Some(other) => {
            return Err(Error::invalid_arg(format!(
                "`model_properties` must be a dictionary, found {}",
                other
            )))
        }
    };

    let Some(dimensions) = properties.get("dimensions") else {
        return Err(Error::invalid_arg(format!(
            "`model_properties` for `{}` must have `dimensions` set",
            NO_MODEL
        )));
    };
    if let Some(key) = properties.keys().find(|k| k.as_str() != "dimensions") {
        return Err(Error::invalid_arg(format!(
            "Invalid model_properties key found: `{}`. Only `dimensions` is allowed for `{}`",
            key, NO_MODEL
        )));
    }
    if !dimensions.as_u64().is_some_and(|d| d > 0) {
        return Err(Error::invalid_arg(format!(
            "`dimensions` must be a positive integer, found {}",
            dimensions
        )));
    }
    Ok(())
}

/// Full resolution of user settings: model rules, autofill, structural
/// validation, then the `no_model` rule.
pub fn resolve_index_settings(settings: &Value, limits: &ValidationLimits) -> Result<IndexSettings> {
    validate_model_name_and_properties(settings)?;
    let filled = autofill_index_settings(settings);
    let resolved = validate_settings_object(&filled, limits)?;

    if resolved.index_defaults.model == NO_MODEL {
        let properties = resolved
            .index_defaults
            .model_properties
            .as_ref()
            .map(|p| Value::Object(p.clone()));
        validate_model_properties_no_model(properties.as_ref())?;
    }

    tracing::debug!(
        model = %resolved.index_defaults.model,
        shards = resolved.number_of_shards,
        replicas = resolved.number_of_replicas,
        "index settings resolved"
    );
    Ok(resolved)
}

/// Where a structural key belongs, if it is one.
fn home_of(key: &str) -> Option<&'static str> {
    if ROOT_KEYS.contains(&key) {
        Some("the root of the settings object")
    } else if INDEX_DEFAULTS_KEYS.contains(&key) {
        Some("`index_defaults`")
    } else if TEXT_PREPROCESSING_KEYS.contains(&key) {
        Some("`text_preprocessing`")
    } else if IMAGE_PREPROCESSING_KEYS.contains(&key) {
        Some("`image_preprocessing`")
    } else {
        None
    }
}

/// Reject structural keys from other levels. With `strict`, any other
/// unknown key is rejected too.
fn check_keys(
    obj: &Map<String, Value>,
    allowed: &[&str],
    level: &str,
    strict: bool,
) -> ShapeResult<()> {
    for key in obj.keys() {
        if allowed.contains(&key.as_str()) {
            continue;
        }
        if let Some(home) = home_of(key) {
            return Err(SchemaViolation(format!(
                "Misplaced field `{}` found in {}. It belongs in {}",
                key, level, home
            )));
        }
    }
    if strict {
        no_additional_properties(obj, allowed)?;
    }
    Ok(())
}

fn extras(obj: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn integer_at_least(value: &Value, min: i64) -> ShapeResult<u64> {
    let n = expect_integer(value)?;
    if n < min {
        return Err(SchemaViolation(format!("{} is less than the minimum of {}", n, min)));
    }
    Ok(n.unsigned_abs())
}

/// An absent key is `None`; a present key must hold a string, never `null`.
fn optional_string(obj: &Map<String, Value>, key: &str) -> ShapeResult<Option<String>> {
    obj.get(key)
        .map(|v| expect_string(v).map(str::to_string))
        .transpose()
}

fn optional_object(obj: &Map<String, Value>, key: &str) -> ShapeResult<Option<Map<String, Value>>> {
    obj.get(key).map(|v| expect_object(v).cloned()).transpose()
}

fn parse_settings(settings: &Value, limits: &ValidationLimits) -> ShapeResult<IndexSettings> {
    let root = expect_object(settings)?;
    check_keys(root, ROOT_KEYS, "the root of the settings object", true)?;

    let index_defaults = parse_index_defaults(require(root, INDEX_DEFAULTS)?, limits)?;
    let number_of_shards = integer_at_least(require(root, NUMBER_OF_SHARDS)?, 1)?;
    let number_of_replicas = integer_at_least(require(root, NUMBER_OF_REPLICAS)?, 0)?;

    Ok(IndexSettings {
        index_defaults,
        number_of_shards,
        number_of_replicas,
    })
}

fn parse_index_defaults(value: &Value, limits: &ValidationLimits) -> ShapeResult<IndexDefaults> {
    let obj = expect_object(value)?;
    check_keys(obj, INDEX_DEFAULTS_KEYS, "`index_defaults`", true)?;

    let model = expect_string(require(obj, MODEL)?)?.to_string();
    let normalize_embeddings = expect_bool(require(obj, NORMALIZE_EMBEDDINGS)?)?;
    let treat_urls_and_pointers_as_images =
        expect_bool(require(obj, TREAT_URLS_AND_POINTERS_AS_IMAGES)?)?;
    let text_preprocessing = parse_text_preprocessing(require(obj, TEXT_PREPROCESSING)?)?;
    let image_preprocessing = parse_image_preprocessing(require(obj, IMAGE_PREPROCESSING)?)?;

    let ann_parameters = obj
        .get(ANN_PARAMETERS)
        .map(|raw| parse_ann_parameters(raw, limits))
        .transpose()?;

    Ok(IndexDefaults {
        model,
        model_properties: optional_object(obj, MODEL_PROPERTIES)?,
        search_model: optional_string(obj, SEARCH_MODEL)?,
        search_model_properties: optional_object(obj, SEARCH_MODEL_PROPERTIES)?,
        normalize_embeddings,
        treat_urls_and_pointers_as_images,
        text_preprocessing,
        image_preprocessing,
        ann_parameters,
    })
}

fn parse_text_preprocessing(value: &Value) -> ShapeResult<TextPreprocessing> {
    let obj = expect_object(value)?;
    check_keys(obj, TEXT_PREPROCESSING_KEYS, "`text_preprocessing`", false)?;

    let split_length = integer_at_least(require(obj, SPLIT_LENGTH)?, 1)?;
    let split_overlap = integer_at_least(require(obj, SPLIT_OVERLAP)?, 0)?;
    let raw_method = require(obj, SPLIT_METHOD)?;
    let split_method = expect_string(raw_method)?
        .parse::<SplitMethod>()
        .map_err(|_| not_one_of(raw_method, SplitMethod::VALUES))?;

    if split_overlap >= split_length {
        return Err(SchemaViolation(format!(
            "split_overlap ({}) must be less than split_length ({})",
            split_overlap, split_length
        )));
    }

    Ok(TextPreprocessing {
        split_length,
        split_overlap,
        split_method,
        override_text_chunk_prefix: optional_string(obj, OVERRIDE_TEXT_CHUNK_PREFIX)?,
        override_text_query_prefix: optional_string(obj, OVERRIDE_TEXT_QUERY_PREFIX)?,
        extra: extras(obj, TEXT_PREPROCESSING_KEYS),
    })
}

fn parse_image_preprocessing(value: &Value) -> ShapeResult<ImagePreprocessing> {
    let obj = expect_object(value)?;
    check_keys(obj, IMAGE_PREPROCESSING_KEYS, "`image_preprocessing`", false)?;

    let patch_method = match require(obj, PATCH_METHOD)? {
        Value::Null => None,
        other => Some(expect_string(other)?.to_string()),
    };

    Ok(ImagePreprocessing {
        patch_method,
        extra: extras(obj, IMAGE_PREPROCESSING_KEYS),
    })
}
