//! ANN (approximate nearest neighbour) parameters
//!
//! An index may persist a partial ANN block. Resolution fills everything the
//! index left out from the default HNSW configuration:
//!
//! - no block at all: full defaults
//! - only `name`/`space_type`/`engine` given: default `parameters` still apply
//! - partial `parameters`: each omitted entry comes from the default table,
//!   each supplied entry is kept verbatim

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tensorgate_core::shape::{
    expect_integer, expect_object, expect_string, no_additional_properties, not_one_of,
    ShapeResult,
};
use tensorgate_core::{SchemaViolation, ValidationLimits};

pub const NAME: &str = "name";
pub const SPACE_TYPE: &str = "space_type";
pub const ENGINE: &str = "engine";
pub const PARAMETERS: &str = "parameters";

pub const EF_CONSTRUCTION: &str = "ef_construction";
pub const M: &str = "m";

pub const DEFAULT_METHOD: &str = "hnsw";
pub const DEFAULT_SPACE_TYPE: &str = "cosinesimil";
pub const DEFAULT_ENGINE: &str = "lucene";
pub const DEFAULT_EF_CONSTRUCTION: u64 = 128;
pub const DEFAULT_M: u64 = 16;

pub const MIN_M: i64 = 2;
pub const MAX_M: i64 = 100;

/// Distance functions the backend understands
pub const SPACE_TYPES: &[&str] = &["cosinesimil", "l1", "l2", "linf", "innerproduct"];

/// ANN block as persisted in index settings; every key is optional
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnParametersOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

/// Fully resolved ANN configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnParameters {
    pub name: String,
    pub space_type: String,
    pub engine: String,
    pub parameters: Map<String, Value>,
}

impl From<&AnnParameters> for AnnParametersOverride {
    fn from(resolved: &AnnParameters) -> Self {
        Self {
            name: Some(resolved.name.clone()),
            space_type: Some(resolved.space_type.clone()),
            engine: Some(resolved.engine.clone()),
            parameters: Some(resolved.parameters.clone()),
        }
    }
}

/// Default parameter table of the default method.
pub fn default_method_parameters() -> Map<String, Value> {
    let mut parameters = Map::new();
    parameters.insert(EF_CONSTRUCTION.to_string(), Value::from(DEFAULT_EF_CONSTRUCTION));
    parameters.insert(M.to_string(), Value::from(DEFAULT_M));
    parameters
}

pub fn default_ann_parameters() -> AnnParameters {
    AnnParameters {
        name: DEFAULT_METHOD.to_string(),
        space_type: DEFAULT_SPACE_TYPE.to_string(),
        engine: DEFAULT_ENGINE.to_string(),
        parameters: default_method_parameters(),
    }
}

/// Fill an index's ANN block from the defaults. Idempotent.
pub fn resolve_ann_parameters(overrides: Option<&AnnParametersOverride>) -> AnnParameters {
    let mut resolved = default_ann_parameters();
    let Some(overrides) = overrides else {
        return resolved;
    };

    if let Some(name) = &overrides.name {
        resolved.name = name.clone();
    }
    if let Some(space_type) = &overrides.space_type {
        resolved.space_type = space_type.clone();
    }
    if let Some(engine) = &overrides.engine {
        resolved.engine = engine.clone();
    }
    if let Some(parameters) = &overrides.parameters {
        for (key, value) in parameters {
            resolved.parameters.insert(key.clone(), value.clone());
        }
    }
    resolved
}

/// Structural check of a raw ANN block.
pub(crate) fn parse_ann_parameters(
    value: &Value,
    limits: &ValidationLimits,
) -> ShapeResult<AnnParametersOverride> {
    let obj = expect_object(value)?;
    no_additional_properties(obj, &[NAME, SPACE_TYPE, ENGINE, PARAMETERS])?;

    let optional_string = |key: &str| -> ShapeResult<Option<String>> {
        obj.get(key)
            .map(|v| expect_string(v).map(str::to_string))
            .transpose()
    };

    let space_type = optional_string(SPACE_TYPE)?;
    if let (Some(space_type), Some(raw)) = (&space_type, obj.get(SPACE_TYPE)) {
        if !SPACE_TYPES.contains(&space_type.as_str()) {
            return Err(not_one_of(raw, SPACE_TYPES));
        }
    }

    let parameters = match obj.get(PARAMETERS) {
        Some(raw) => Some(parse_method_parameters(raw, limits)?),
        None => None,
    };

    Ok(AnnParametersOverride {
        name: optional_string(NAME)?,
        space_type,
        engine: optional_string(ENGINE)?,
        parameters,
    })
}

fn parse_method_parameters(
    value: &Value,
    limits: &ValidationLimits,
) -> ShapeResult<Map<String, Value>> {
    let obj = expect_object(value)?;
    no_additional_properties(obj, &[EF_CONSTRUCTION, M])?;

    let max_ef = i64::try_from(limits.ef_construction_max_value).unwrap_or(i64::MAX);
    if let Some(ef) = obj.get(EF_CONSTRUCTION) {
        check_range(expect_integer(ef)?, 1, max_ef)?;
    }
    if let Some(m) = obj.get(M) {
        check_range(expect_integer(m)?, MIN_M, MAX_M)?;
    }
    Ok(obj.clone())
}

fn check_range(value: i64, min: i64, max: i64) -> ShapeResult<i64> {
    if value < min {
        Err(SchemaViolation(format!("{} is less than the minimum of {}", value, min)))
    } else if value > max {
        Err(SchemaViolation(format!("{} is greater than the maximum of {}", value, max)))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let defaults = default_ann_parameters();
        assert_eq!(
            serde_json::to_value(&defaults).unwrap(),
            json!({
                "name": "hnsw",
                "space_type": "cosinesimil",
                "engine": "lucene",
                "parameters": {"ef_construction": 128, "m": 16}
            })
        );
        assert_eq!(resolve_ann_parameters(None), defaults);
        assert_eq!(resolve_ann_parameters(Some(&AnnParametersOverride::default())), defaults);
    }

    #[test]
    fn test_method_name_override_keeps_default_parameters() {
        let overrides = AnnParametersOverride {
            name: Some("not-hnsw".to_string()),
            ..Default::default()
        };
        let resolved = resolve_ann_parameters(Some(&overrides));
        assert_eq!(resolved.name, "not-hnsw");
        assert_eq!(resolved.parameters, default_method_parameters());
        assert_eq!(resolved.space_type, DEFAULT_SPACE_TYPE);
    }

    #[test]
    fn test_partial_parameters_are_backfilled() {
        let mut parameters = Map::new();
        parameters.insert(M.to_string(), json!(2));
        let overrides = AnnParametersOverride {
            parameters: Some(parameters),
            ..Default::default()
        };
        let resolved = resolve_ann_parameters(Some(&overrides));
        assert_eq!(resolved.name, DEFAULT_METHOD);
        assert_eq!(resolved.parameters[M], json!(2));
        assert_eq!(resolved.parameters[EF_CONSTRUCTION], json!(DEFAULT_EF_CONSTRUCTION));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let overrides = AnnParametersOverride {
            space_type: Some("l2".to_string()),
            parameters: Some(json!({"ef_construction": 1}).as_object().unwrap().clone()),
            ..Default::default()
        };
        let once = resolve_ann_parameters(Some(&overrides));
        let twice = resolve_ann_parameters(Some(&AnnParametersOverride::from(&once)));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_ann_block() {
        let limits = ValidationLimits::default();
        let parsed = parse_ann_parameters(
            &json!({"name": "hnsw", "space_type": "l2", "parameters": {"ef_construction": 512, "m": 24}}),
            &limits,
        )
        .unwrap();
        assert_eq!(parsed.space_type.as_deref(), Some("l2"));
        assert!(parsed.engine.is_none());

        let invalid = [
            (json!({"space_type": "hamming"}), "is not one of"),
            (json!({"parameters": {"m": 1}}), "less than the minimum"),
            (json!({"parameters": {"m": 101}}), "greater than the maximum"),
            (json!({"parameters": {"ef_construction": 0}}), "less than the minimum"),
            (json!({"parameters": {"ef_construction": 5000}}), "greater than the maximum"),
            (json!({"parameters": {"ef_construction": "128"}}), "is not of type 'integer'"),
            (json!({"parameters": {"ef_search": 10}}), "Additional properties"),
            (json!({"method": "hnsw"}), "Additional properties"),
            (json!({"name": 5}), "is not of type 'string'"),
        ];
        for (block, expected) in invalid {
            let err = parse_ann_parameters(&block, &limits).unwrap_err();
            assert!(err.0.contains(expected), "{} -> {}", block, err);
        }
    }

    #[test]
    fn test_ef_construction_ceiling_from_limits() {
        let mut limits = ValidationLimits::default();
        limits.ef_construction_max_value = 256;
        assert!(parse_ann_parameters(&json!({"parameters": {"ef_construction": 256}}), &limits).is_ok());
        assert!(parse_ann_parameters(&json!({"parameters": {"ef_construction": 257}}), &limits).is_err());
    }
}
