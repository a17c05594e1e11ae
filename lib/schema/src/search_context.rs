//! Search context
//!
//! Caller-supplied weighted vectors that are blended with the query vector.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tensorgate_core::shape::{
    expect_array, expect_number, expect_object, no_additional_properties, require,
    ShapeResult,
};
use tensorgate_core::{Error, Result};

/// Maximum number of weighted vectors a search context may carry.
pub const MAX_CONTEXT_VECTORS: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedVector {
    pub vector: Vec<f32>,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchContext {
    pub tensor: Vec<WeightedVector>,
}

impl SearchContext {
    /// Parse and validate a raw search context.
    ///
    /// Unknown top-level keys are ignored. Entries of `tensor` may only carry
    /// `vector` and `weight`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = expect_object(value).map_err(|v| context_error(&v))?;
        let tensor = match obj.get("tensor") {
            None | Some(Value::Null) => {
                return Err(Error::invalid_arg(
                    "Invalid search context: `tensor` is required and can't be None",
                ))
            }
            Some(tensor) => expect_array(tensor).map_err(|v| context_error(&v))?,
        };

        if tensor.is_empty() || tensor.len() > MAX_CONTEXT_VECTORS {
            return Err(Error::invalid_arg(format!(
                "Invalid search context: `tensor` must contain between 1 and {} vectors, found {}",
                MAX_CONTEXT_VECTORS,
                tensor.len()
            )));
        }

        let tensor = tensor
            .iter()
            .map(parse_weighted_vector)
            .collect::<ShapeResult<Vec<_>>>()
            .map_err(|v| context_error(&v))?;
        Ok(Self { tensor })
    }

    /// Check every context vector against the model's dimensionality.
    pub fn check_dimensions(&self, dimensions: usize) -> Result<&Self> {
        match self.tensor.iter().position(|v| v.vector.len() != dimensions) {
            None => Ok(self),
            Some(i) => Err(Error::invalid_arg(format!(
                "Invalid search context: vector {} has {} dimensions, the index model expects {}",
                i,
                self.tensor[i].vector.len(),
                dimensions
            ))),
        }
    }
}

fn context_error(violation: &impl std::fmt::Display) -> Error {
    Error::invalid_arg(format!("Invalid search context. Reason: {}", violation))
}

fn parse_weighted_vector(value: &Value) -> ShapeResult<WeightedVector> {
    let obj = expect_object(value)?;
    let raw_vector = require(obj, "vector")?;
    let raw_weight = require(obj, "weight")?;
    no_additional_properties(obj, &["vector", "weight"])?;

    let vector = expect_array(raw_vector)?
        .iter()
        .map(|x| expect_number(x).map(|n| n as f32))
        .collect::<ShapeResult<Vec<f32>>>()?;
    let weight = expect_number(raw_weight)? as f32;
    Ok(WeightedVector { vector, weight })
}
