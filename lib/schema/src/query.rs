//! Search request parameters
//!
//! Search method, searchable attributes and boost.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tensorgate_core::shape::repr;
use tensorgate_core::{validate_field_name, validate_str_against_enum, Error, Result, ValidationLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMethod {
    Lexical,
    Tensor,
}

impl SearchMethod {
    pub const VALUES: &'static [&'static str] = &["LEXICAL", "TENSOR"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMethod::Lexical => "LEXICAL",
            SearchMethod::Tensor => "TENSOR",
        }
    }
}

impl FromStr for SearchMethod {
    type Err = Error;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let s = validate_str_against_enum(s, Self::VALUES, false)?;
        if s.eq_ignore_ascii_case("TENSOR") {
            Ok(SearchMethod::Tensor)
        } else {
            Ok(SearchMethod::Lexical)
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enforce the searchable tensor attribute ceiling.
///
/// Only applies to tensor search, and only when a ceiling is configured.
pub fn validate_searchable_attributes<'a>(
    searchable_attributes: Option<&'a [String]>,
    search_method: SearchMethod,
    limits: &ValidationLimits,
) -> Result<Option<&'a [String]>> {
    if search_method != SearchMethod::Tensor {
        return Ok(searchable_attributes);
    }
    let Some(max) = limits.max_searchable_tensor_attributes else {
        return Ok(searchable_attributes);
    };

    match searchable_attributes {
        None => Err(Error::invalid_arg(format!(
            "No searchable_attributes provided, but the environment variable \
             MARQO_MAX_SEARCHABLE_TENSOR_ATTRIBUTES is set to {}. Provide at most {} \
             searchable_attributes",
            max, max
        ))),
        Some(attrs) if attrs.len() > max => Err(Error::invalid_arg(format!(
            "Maximum searchable attributes (set via MARQO_MAX_SEARCHABLE_TENSOR_ATTRIBUTES) \
             is {}. Found {} searchable_attributes",
            max,
            attrs.len()
        ))),
        Some(attrs) => Ok(Some(attrs)),
    }
}

/// Validate a boost mapping: field name to `[weight]` or `[weight, bias]`.
///
/// Boosting only exists for tensor search. An absent boost is always valid.
pub fn validate_boost(boost: Option<&Value>, search_method: SearchMethod) -> Result<Option<&Value>> {
    let Some(boost) = boost else {
        return Ok(None);
    };
    if search_method != SearchMethod::Tensor {
        return Err(Error::invalid_arg(format!(
            "Boosting is only available for {} search, found {}",
            SearchMethod::Tensor,
            search_method
        )));
    }
    let Some(fields) = boost.as_object() else {
        return Err(Error::invalid_arg(format!(
            "boost must be a dictionary of field name to [weight] or [weight, bias], found {}",
            repr(boost)
        )));
    };

    for (field, params) in fields {
        validate_field_name(field)?;
        let valid = params.as_array().is_some_and(|p| {
            (1..=2).contains(&p.len()) && p.iter().all(Value::is_number)
        });
        if !valid {
            return Err(Error::invalid_arg(format!(
                "boost for field `{}` must be [weight] or [weight, bias], found {}",
                field,
                repr(params)
            )));
        }
    }
    Ok(Some(boost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_method_parse() {
        assert_eq!("TENSOR".parse::<SearchMethod>().unwrap(), SearchMethod::Tensor);
        assert_eq!("lexical".parse::<SearchMethod>().unwrap(), SearchMethod::Lexical);
        assert!(matches!("OTHER".parse::<SearchMethod>(), Err(Error::InvalidValue(_))));
        assert_eq!(
            serde_json::to_value(SearchMethod::Tensor).unwrap(),
            json!("TENSOR")
        );
    }

    #[test]
    fn test_searchable_attributes_without_limit() {
        let limits = ValidationLimits::default();
        let attrs = vec!["a".to_string(); 100];
        assert!(validate_searchable_attributes(Some(&attrs), SearchMethod::Tensor, &limits).is_ok());
        assert!(validate_searchable_attributes(None, SearchMethod::Tensor, &limits).is_ok());
    }

    #[test]
    fn test_searchable_attributes_with_limit() {
        let limits = ValidationLimits::default().with_max_searchable_tensor_attributes(Some(1));
        let one = vec!["a".to_string()];
        let two = vec!["a".to_string(), "b".to_string()];

        assert!(validate_searchable_attributes(Some(&one), SearchMethod::Tensor, &limits).is_ok());
        assert!(matches!(
            validate_searchable_attributes(Some(&two), SearchMethod::Tensor, &limits),
            Err(Error::InvalidArg(_))
        ));

        let err = validate_searchable_attributes(None, SearchMethod::Tensor, &limits).unwrap_err();
        assert!(err.message().contains("MARQO_MAX_SEARCHABLE_TENSOR_ATTRIBUTES"));

        // lexical search ignores the ceiling
        assert!(validate_searchable_attributes(Some(&two), SearchMethod::Lexical, &limits).is_ok());
        assert!(validate_searchable_attributes(None, SearchMethod::Lexical, &limits).is_ok());
    }

    #[test]
    fn test_boost_valid() {
        let valid = [
            json!({"model_properties_field": [1.2, 2]}),
            json!({"a": [1], "b": [-0.5, 3.3]}),
            json!({}),
        ];
        for boost in valid {
            assert!(validate_boost(Some(&boost), SearchMethod::Tensor).is_ok(), "{}", boost);
        }
        assert!(validate_boost(None, SearchMethod::Tensor).is_ok());
        assert!(validate_boost(None, SearchMethod::Lexical).is_ok());
    }

    #[test]
    fn test_boost_invalid() {
        let invalid = [
            json!({"a": []}),
            json!({"a": [1, 2, 3]}),
            json!({"a": ["1"]}),
            json!({"a": 1}),
            json!([["a", 1]]),
            json!("a"),
            json!({"__vector_a": [1]}),
            json!({"": [1]}),
        ];
        for boost in invalid {
            assert!(validate_boost(Some(&boost), SearchMethod::Tensor).is_err(), "{}", boost);
        }
    }

    #[test]
    fn test_boost_only_for_tensor() {
        let boost = json!({"a": [1.0]});
        assert!(matches!(
            validate_boost(Some(&boost), SearchMethod::Lexical),
            Err(Error::InvalidArg(_))
        ));
        assert!(validate_boost(Some(&json!({})), SearchMethod::Lexical).is_err());
    }
}
