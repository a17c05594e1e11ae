//! Built-in model registry
//!
//! Fixed property records for the models the embedding pipeline ships with.
//! Models outside the registry must come with caller-supplied properties.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tensorgate_core::{Error, Result};

/// Placeholder model for indexes that only hold custom vectors
pub const NO_MODEL: &str = "no_model";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelProperties {
    fn registry(name: &str, dimensions: usize, notes: &str, model_type: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            dimensions: Some(dimensions),
            notes: Some(notes.to_string()),
            url: None,
            model_type: Some(model_type.to_string()),
            extra: Map::new(),
        }
    }

    fn with_tokens(mut self, tokens: u64) -> Self {
        self.extra.insert("tokens".to_string(), Value::from(tokens));
        self
    }

    /// Parse caller-supplied properties. Every key is optional here.
    pub fn from_map(properties: &Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(properties.clone()))
            .map_err(|e| Error::invalid_arg(format!("Invalid model properties: {}", e)))
    }

    /// `dimensions`, which embedding and custom vectors cannot do without.
    pub fn require_dimensions(&self) -> Result<usize> {
        self.dimensions.ok_or_else(|| {
            Error::invalid_arg(format!(
                "Model properties for `{}` must have `dimensions` set",
                self.name.as_deref().unwrap_or("custom model")
            ))
        })
    }
}

/// Names of every model in the registry
pub const REGISTERED_MODELS: &[&str] = &[
    "RN50",
    "RN101",
    "ViT-B/32",
    "ViT-L/14",
    "hf/all_datasets_v4_MiniLM-L6",
    "hf/all-MiniLM-L6-v2",
];

/// Look up a registered model by name.
pub fn lookup(name: &str) -> Option<ModelProperties> {
    let properties = match name {
        "RN50" => ModelProperties::registry("RN50", 1024, "CLIP resnet50", "clip"),
        "RN101" => ModelProperties::registry("RN101", 512, "CLIP resnet101", "clip"),
        "ViT-B/32" => ModelProperties::registry("ViT-B/32", 512, "CLIP ViT-B/32", "clip"),
        "ViT-L/14" => ModelProperties::registry("ViT-L/14", 768, "CLIP ViT-L/14", "clip"),
        "hf/all_datasets_v4_MiniLM-L6" => ModelProperties::registry(
            "flax-sentence-embeddings/all_datasets_v4_MiniLM-L6",
            384,
            "useful for semantic search, trained on a large dataset mix",
            "hf",
        )
        .with_tokens(128),
        "hf/all-MiniLM-L6-v2" => ModelProperties::registry(
            "sentence-transformers/all-MiniLM-L6-v2",
            384,
            "general purpose sentence embeddings",
            "hf",
        )
        .with_tokens(256),
        _ => return None,
    };
    Some(properties)
}

/// Registry record for `name`, else the supplied properties.
pub fn resolve_model_properties(
    name: &str,
    supplied: Option<&Map<String, Value>>,
) -> Result<ModelProperties> {
    if let Some(properties) = lookup(name) {
        return Ok(properties);
    }
    match supplied {
        Some(properties) => ModelProperties::from_map(properties),
        None => Err(Error::invalid_arg(format!(
            "Could not find model properties for model `{}`. \
             Provide `model_properties` for custom models",
            name
        ))),
    }
}
