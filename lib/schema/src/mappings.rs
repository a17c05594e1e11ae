//! Field mappings
//!
//! The `mappings` object declares which document fields carry dict content and
//! how that content is interpreted. Two field types exist: multimodal
//! combinations (weighted sub-fields) and custom vectors (caller-supplied
//! embeddings). Raw JSON is parsed once into [`Mappings`]; everything
//! downstream matches on the closed [`FieldMapping`] enum.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use tensorgate_core::shape::{
    expect_object, no_additional_properties, not_of_type, not_one_of, require, ShapeResult,
};
use tensorgate_core::{Error, Result};

pub const MULTIMODAL_COMBINATION: &str = "multimodal_combination";
pub const CUSTOM_VECTOR: &str = "custom_vector";

/// Every legal value of a mapping's `type` tag.
pub const MAPPING_TYPES: &[&str] = &[MULTIMODAL_COMBINATION, CUSTOM_VECTOR];

/// How a dict-valued document field is interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldMapping {
    /// Sub-fields are vectorised separately and combined with these weights.
    /// Weights may be negative or zero, and the map may be empty. They are
    /// kept as JSON numbers so integer weights serialize back as integers.
    MultimodalCombination { weights: BTreeMap<String, Number> },
    /// The document supplies `{content, vector}` directly.
    CustomVector,
}

impl FieldMapping {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldMapping::MultimodalCombination { .. } => MULTIMODAL_COMBINATION,
            FieldMapping::CustomVector => CUSTOM_VECTOR,
        }
    }
}

/// Validated mappings keyed by document field name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mappings(BTreeMap<String, FieldMapping>);

impl Mappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a raw `mappings` object.
    pub fn from_json(value: &Value) -> Result<Self> {
        validate_mappings_object(value)
    }

    pub fn insert(&mut self, field: impl Into<String>, mapping: FieldMapping) {
        self.0.insert(field.into(), mapping);
    }

    pub fn get(&self, field: &str) -> Option<&FieldMapping> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldMapping)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields declared as custom vectors
    pub fn custom_vector_fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, mapping)| matches!(mapping, FieldMapping::CustomVector))
            .map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, FieldMapping)> for Mappings {
    fn from_iter<I: IntoIterator<Item = (String, FieldMapping)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Validate a whole `mappings` object.
///
/// Each entry must match exactly one field type, selected by its `type` tag.
pub fn validate_mappings_object(mappings: &Value) -> Result<Mappings> {
    let entries = expect_object(mappings).map_err(|v| mappings_error(&v))?;
    let mut parsed = Mappings::new();
    for (field, mapping) in entries {
        let mapping = parse_field_mapping(mapping).map_err(|v| mappings_error(&v))?;
        parsed.insert(field.clone(), mapping);
    }
    Ok(parsed)
}

/// Validate a single `multimodal_combination` mapping entry.
pub fn validate_multimodal_combination_mappings_object(value: &Value) -> Result<FieldMapping> {
    parse_multimodal_combination(value).map_err(|v| {
        Error::invalid_arg(format!(
            "Error validating multimodal combination mappings object. Reason: {}",
            v
        ))
    })
}

/// Validate a single `custom_vector` mapping entry.
pub fn validate_custom_vector_mappings_object(value: &Value) -> Result<FieldMapping> {
    parse_custom_vector(value).map_err(|v| {
        Error::invalid_arg(format!(
            "Error validating custom vector mappings object. Reason: {}",
            v
        ))
    })
}

fn mappings_error(violation: &impl std::fmt::Display) -> Error {
    Error::invalid_arg(format!("Error validating mappings object. Reason: {}", violation))
}

fn parse_field_mapping(value: &Value) -> ShapeResult<FieldMapping> {
    let obj = expect_object(value)?;
    let type_tag = require(obj, "type")?;
    match type_tag.as_str() {
        Some(MULTIMODAL_COMBINATION) => parse_multimodal_combination(value),
        Some(CUSTOM_VECTOR) => parse_custom_vector(value),
        _ => Err(not_one_of(type_tag, MAPPING_TYPES)),
    }
}

fn parse_multimodal_combination(value: &Value) -> ShapeResult<FieldMapping> {
    let obj = expect_object(value)?;
    let type_tag = require(obj, "type")?;
    let raw_weights = require(obj, "weights")?;
    if type_tag.as_str() != Some(MULTIMODAL_COMBINATION) {
        return Err(not_one_of(type_tag, &[MULTIMODAL_COMBINATION]));
    }

    let mut weights = BTreeMap::new();
    for (sub_field, weight) in expect_object(raw_weights)? {
        let Value::Number(weight) = weight else {
            return Err(not_of_type(weight, "number"));
        };
        weights.insert(sub_field.clone(), weight.clone());
    }

    no_additional_properties(obj, &["type", "weights"])?;
    Ok(FieldMapping::MultimodalCombination { weights })
}

fn parse_custom_vector(value: &Value) -> ShapeResult<FieldMapping> {
    let obj = expect_object(value)?;
    let type_tag = require(obj, "type")?;
    if type_tag.as_str() != Some(CUSTOM_VECTOR) {
        return Err(not_one_of(type_tag, &[CUSTOM_VECTOR]));
    }
    no_additional_properties(obj, &["type"])?;
    Ok(FieldMapping::CustomVector)
}
