//! Dict-valued document fields
//!
//! A field whose content is a JSON object must be declared in the mappings.
//! The mapping's type decides the accepted shape:
//!
//! - `multimodal_combination`: `{sub_field: string, ...}`, every sub-field weighted
//! - `custom_vector`: `{"content"?: string, "vector": [number; dims]}`

use crate::mappings::{FieldMapping, Mappings};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use tensorgate_core::shape::{
    exact_len, expect_array, expect_number, expect_object, expect_string,
    no_additional_properties, repr, require, ShapeResult,
};
use tensorgate_core::{Error, Result};

/// Normalized content of a validated dict field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DictFieldContent {
    MultimodalCombination(BTreeMap<String, String>),
    CustomVector {
        /// Empty when the document omitted `content`.
        content: String,
        vector: Vec<f64>,
    },
}

impl DictFieldContent {
    pub fn to_value(&self) -> Value {
        match self {
            DictFieldContent::MultimodalCombination(sub_fields) => Value::Object(
                sub_fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            DictFieldContent::CustomVector { content, vector } => {
                let mut obj = Map::new();
                obj.insert("content".to_string(), Value::String(content.clone()));
                obj.insert(
                    "vector".to_string(),
                    Value::Array(vector.iter().copied().map(Value::from).collect()),
                );
                Value::Object(obj)
            }
        }
    }
}

/// Validate the content of a dict-valued field against its mapping.
///
/// A non-positive or missing `index_model_dimensions` is an internal error:
/// the index always knows its model dimensions.
pub fn validate_dict(
    field: &str,
    field_content: &Value,
    is_non_tensor_field: bool,
    mappings: Option<&Mappings>,
    index_model_dimensions: Option<usize>,
) -> Result<DictFieldContent> {
    let Some(mappings) = mappings else {
        return Err(Error::invalid_arg(format!(
            "The field `{}` contains a dictionary, so the parameter `mappings` must be provided",
            field
        )));
    };
    let Some(mapping) = mappings.get(field) else {
        return Err(Error::invalid_arg(format!(
            "The field `{}` is a dictionary field, so it must be in the add_documents `mappings` parameter",
            field
        )));
    };
    let Some(content) = field_content.as_object() else {
        return Err(Error::invalid_arg(format!(
            "The field `{}` is mapped as {} and its content must be a dictionary, found {}",
            field,
            mapping.type_name(),
            repr(field_content)
        )));
    };

    match mapping {
        FieldMapping::MultimodalCombination { weights } => {
            validate_multimodal_combination(field, content, is_non_tensor_field, weights)
        }
        FieldMapping::CustomVector => validate_custom_vector(
            field,
            field_content,
            is_non_tensor_field,
            index_model_dimensions,
        ),
    }
}

fn validate_multimodal_combination(
    field: &str,
    content: &Map<String, Value>,
    is_non_tensor_field: bool,
    weights: &BTreeMap<String, Number>,
) -> Result<DictFieldContent> {
    if is_non_tensor_field {
        return Err(Error::invalid_arg(format!(
            "Field `{}` has type multimodal_combination, so it must be a tensor field. \
             Remove it from non_tensor_fields",
            field
        )));
    }
    if content.is_empty() {
        return Err(Error::invalid_arg(format!(
            "The multimodal_combination field `{}` is empty, it must contain at least 1 field",
            field
        )));
    }

    let mut sub_fields = BTreeMap::new();
    for (sub_field, value) in content {
        let Some(text) = value.as_str() else {
            return Err(Error::invalid_arg(format!(
                "Sub-field `{}` of multimodal_combination field `{}` is not of valid content type: {}. \
                 Only strings are allowed",
                sub_field,
                field,
                repr(value)
            )));
        };
        if !weights.contains_key(sub_field) {
            return Err(Error::invalid_arg(format!(
                "Each sub_field requires a weight in the `mappings` parameter. \
                 Sub-field `{}` of field `{}` has no weight",
                sub_field, field
            )));
        }
        sub_fields.insert(sub_field.clone(), text.to_string());
    }
    Ok(DictFieldContent::MultimodalCombination(sub_fields))
}

fn validate_custom_vector(
    field: &str,
    field_content: &Value,
    is_non_tensor_field: bool,
    index_model_dimensions: Option<usize>,
) -> Result<DictFieldContent> {
    if is_non_tensor_field {
        return Err(Error::invalid_arg(format!(
            "Field `{}` has type custom_vector, so it must be a tensor field. \
             Remove it from non_tensor_fields",
            field
        )));
    }
    let dimensions = match index_model_dimensions {
        Some(d) if d > 0 => d,
        other => {
            return Err(Error::internal(format!(
                "Index model dimensions should be an `int` greater than 0, found {:?}",
                other
            )))
        }
    };

    parse_custom_vector(field_content, dimensions).map_err(|v| {
        Error::invalid_arg(format!(
            "Field `{}` is a custom_vector field and its content is invalid. Reason: {}",
            field, v
        ))
    })
}

fn parse_custom_vector(value: &Value, dimensions: usize) -> ShapeResult<DictFieldContent> {
    let obj = expect_object(value)?;
    let raw_vector = require(obj, "vector")?;
    no_additional_properties(obj, &["content", "vector"])?;

    let content = match obj.get("content") {
        Some(content) => expect_string(content)?.to_string(),
        None => String::new(),
    };

    let items = expect_array(raw_vector)?;
    let vector = items
        .iter()
        .map(expect_number)
        .collect::<ShapeResult<Vec<f64>>>()?;
    exact_len(raw_vector, items, dimensions)?;

    Ok(DictFieldContent::CustomVector { content, vector })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DIMS: usize = 384;

    fn mappings() -> Mappings {
        Mappings::from_json(&json!({
            "my_combo_field": {"type": "multimodal_combination", "weights": {"test_1": 0.5, "test_2": -0.5}},
            "my_custom_vector": {"type": "custom_vector"}
        }))
        .unwrap()
    }

    fn custom(content: Value) -> Result<DictFieldContent> {
        validate_dict("my_custom_vector", &content, false, Some(&mappings()), Some(DIMS))
    }

    fn combo(content: Value) -> Result<DictFieldContent> {
        validate_dict("my_combo_field", &content, false, Some(&mappings()), Some(DIMS))
    }

    fn assert_invalid(result: Result<DictFieldContent>, expected: &str) {
        match result {
            Err(Error::InvalidArg(msg)) => assert!(msg.contains(expected), "{}", msg),
            other => panic!("expected InvalidArg containing {:?}, got {:?}", expected, other),
        }
    }

    #[test]
    fn test_multimodal_combination_valid() {
        let content = json!({"test_1": "https://a.b/c.jpg", "test_2": "some text"});
        assert_eq!(combo(content.clone()).unwrap().to_value(), content);
        assert!(combo(json!({"test_1": "only one"})).is_ok());
    }

    #[test]
    fn test_multimodal_combination_invalid() {
        assert_invalid(
            combo(json!({"test_1": ["my", "test"], "test_2": "text"})),
            "is not of valid content type",
        );
        assert_invalid(combo(json!({"test_1": 1})), "is not of valid content type");
        assert_invalid(combo(json!({"test_1": null})), "is not of valid content type");
        assert_invalid(combo(json!({"test_void": "test"})), "Each sub_field requires a weight");
        assert_invalid(combo(json!({})), "it must contain at least 1 field");
        assert_invalid(
            validate_dict(
                "my_combo_field",
                &json!({"test_1": "text"}),
                true,
                Some(&mappings()),
                Some(DIMS),
            ),
            "must be a tensor field",
        );
    }

    #[test]
    fn test_missing_mappings() {
        assert_invalid(
            validate_dict("my_combo_field", &json!({"test_1": "a"}), false, None, Some(DIMS)),
            "the parameter `mappings`",
        );
        assert_invalid(
            validate_dict("unmapped", &json!({"test_1": "a"}), false, Some(&mappings()), Some(DIMS)),
            "must be in the add_documents `mappings` parameter",
        );
    }

    #[test]
    fn test_custom_vector_valid() {
        let full = json!({"content": "custom content is here!!", "vector": vec![1.0; DIMS]});
        assert_eq!(custom(full.clone()).unwrap().to_value(), full);

        let only_vector = custom(json!({"vector": vec![1.0; DIMS]})).unwrap();
        assert_eq!(
            only_vector.to_value(),
            json!({"content": "", "vector": vec![1.0; DIMS]})
        );
    }

    #[test]
    fn test_custom_vector_invalid_content() {
        let cases = [
            (
                json!({"vector": vec![1.0; DIMS], "extra_field": "blah"}),
                "Additional properties are not allowed ('extra_field' was unexpected)",
            ),
            (json!({"content": "only content, no vector"}), "'vector' is a required property"),
            (json!({"content": 12345, "vector": vec![1.0; DIMS]}), "is not of type 'string'"),
            (
                json!({"content": {"content": "nested"}, "vector": vec![1.0; DIMS]}),
                "is not of type 'string'",
            ),
            (json!({"vector": vec![1.0; DIMS - 1]}), "is too short"),
            (json!({"vector": vec![1.0; DIMS + 1]}), "is too long"),
            (json!({"vector": "not a list"}), "is not of type 'array'"),
        ];
        for (content, expected) in cases {
            assert_invalid(custom(content), expected);
        }

        let mut wrong_item: Vec<Value> = vec![json!(1.0); DIMS - 1];
        wrong_item.push(json!("NOT A FLOAT"));
        assert_invalid(
            custom(json!({"vector": wrong_item})),
            "'NOT A FLOAT' is not of type 'number'",
        );
    }

    #[test]
    fn test_custom_vector_non_tensor() {
        assert_invalid(
            validate_dict(
                "my_custom_vector",
                &json!({"vector": vec![1.0; DIMS]}),
                true,
                Some(&mappings()),
                Some(DIMS),
            ),
            "must be a tensor field",
        );
    }

    #[test]
    fn test_custom_vector_bad_dimensions_is_internal() {
        for dims in [None, Some(0)] {
            let err = validate_dict(
                "my_custom_vector",
                &json!({"vector": [1.0]}),
                false,
                Some(&mappings()),
                dims,
            )
            .unwrap_err();
            assert!(matches!(err, Error::Internal(_)));
            assert!(err.message().contains("Index model dimensions should be an `int`"));
        }
    }
}
