//! Score modifiers
//!
//! Numeric document fields that multiply or add to the relevance score.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tensorgate_core::fields::ID_FIELD;
use tensorgate_core::shape::{
    expect_array, expect_number, expect_object, expect_string, no_additional_properties, require,
    ShapeResult,
};
use tensorgate_core::{Error, Result, SchemaViolation};

pub const MULTIPLY_SCORE_BY: &str = "multiply_score_by";
pub const ADD_TO_SCORE: &str = "add_to_score";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreModifierField {
    pub field_name: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreModifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiply_score_by: Option<Vec<ScoreModifierField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_to_score: Option<Vec<ScoreModifierField>>,
}

impl ScoreModifier {
    /// Parse and validate raw score modifiers.
    ///
    /// At least one list must be present, and a present list may not be empty.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = expect_object(value).map_err(|v| modifier_error(&v))?;
        no_additional_properties(obj, &[MULTIPLY_SCORE_BY, ADD_TO_SCORE])
            .map_err(|v| modifier_error(&v))?;

        let modifier = Self {
            multiply_score_by: parse_list(obj.get(MULTIPLY_SCORE_BY), MULTIPLY_SCORE_BY)?,
            add_to_score: parse_list(obj.get(ADD_TO_SCORE), ADD_TO_SCORE)?,
        };

        if modifier.multiply_score_by.is_none() && modifier.add_to_score.is_none() {
            return Err(Error::invalid_arg(format!(
                "Invalid score modifiers: at least one of `{}` or `{}` must be provided",
                MULTIPLY_SCORE_BY, ADD_TO_SCORE
            )));
        }
        Ok(modifier)
    }

    /// All fields referenced by either list
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.multiply_score_by
            .iter()
            .chain(self.add_to_score.iter())
            .flatten()
            .map(|f| f.field_name.as_str())
    }
}

fn modifier_error(violation: &impl std::fmt::Display) -> Error {
    Error::invalid_arg(format!("Invalid score modifiers. Reason: {}", violation))
}

fn parse_list(raw: Option<&Value>, key: &str) -> Result<Option<Vec<ScoreModifierField>>> {
    let raw = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };
    let entries = expect_array(raw).map_err(|v| modifier_error(&v))?;
    if entries.is_empty() {
        return Err(Error::invalid_arg(format!(
            "Invalid score modifiers: `{}` can't be an empty list",
            key
        )));
    }
    entries
        .iter()
        .map(parse_field)
        .collect::<ShapeResult<Vec<_>>>()
        .map(Some)
        .map_err(|v| modifier_error(&v))
}

fn parse_field(value: &Value) -> ShapeResult<ScoreModifierField> {
    let obj = expect_object(value)?;
    let field_name = expect_string(require(obj, "field_name")?)?;
    no_additional_properties(obj, &["field_name", "weight"])?;

    if field_name == ID_FIELD {
        return Err(SchemaViolation(format!(
            "field_name can't be `{}`, it is a reserved field",
            ID_FIELD
        )));
    }
    let weight = match obj.get("weight") {
        Some(w) => expect_number(w)?,
        None => default_weight(),
    };
    Ok(ScoreModifierField {
        field_name: field_name.to_string(),
        weight,
    })
}
