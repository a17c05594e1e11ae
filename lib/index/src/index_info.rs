//! Read-only view over persisted index metadata

use crate::ann::AnnParameters;
use crate::models::{self, ModelProperties};
use crate::settings::{missing_search_model, IndexSettings};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tensorgate_core::fields::{self, CHUNKS, VECTOR_PREFIX};
use tensorgate_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub model_name: String,
    pub search_model_name: Option<String>,
    /// Backend property tree: field name to property descriptor
    pub properties: Map<String, Value>,
    pub index_settings: IndexSettings,
}

impl IndexInfo {
    pub fn new(
        model_name: impl Into<String>,
        search_model_name: Option<String>,
        properties: Map<String, Value>,
        index_settings: IndexSettings,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            search_model_name,
            properties,
            index_settings,
        }
    }

    /// Build from settings, taking the model names from `index_defaults`.
    pub fn from_settings(properties: Map<String, Value>, index_settings: IndexSettings) -> Self {
        let model_name = index_settings.index_defaults.model.clone();
        let search_model_name = index_settings.index_defaults.search_model.clone();
        Self::new(model_name, search_model_name, properties, index_settings)
    }

    /// Vector properties nested under the chunk key.
    ///
    /// A missing chunk key is an error: every index has one from creation.
    pub fn get_vector_properties(&self) -> Result<Map<String, Value>> {
        let chunks = self
            .properties
            .get(CHUNKS)
            .ok_or_else(|| Error::MissingKey(CHUNKS.to_string()))?;
        let nested = chunks
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::MissingKey(format!("{}.properties", CHUNKS)))?;

        Ok(nested
            .iter()
            .filter(|(name, _)| name.starts_with(VECTOR_PREFIX))
            .map(|(name, property)| (name.clone(), property.clone()))
            .collect())
    }

    /// Top-level user text properties. Empty properties give an empty map.
    pub fn get_text_properties(&self) -> Map<String, Value> {
        self.properties
            .iter()
            .filter(|(name, _)| {
                name.as_str() != CHUNKS
                    && !name.starts_with(VECTOR_PREFIX)
                    && !fields::is_protected(name)
            })
            .map(|(name, property)| (name.clone(), property.clone()))
            .collect()
    }

    pub fn get_ann_parameters(&self) -> AnnParameters {
        self.index_settings.ann_parameters()
    }

    pub fn get_model_properties(&self) -> Result<ModelProperties> {
        models::resolve_model_properties(
            &self.model_name,
            self.index_settings.index_defaults.model_properties.as_ref(),
        )
    }

    /// Registry record for the search model, else its supplied properties.
    pub fn get_search_model_properties(&self) -> Result<ModelProperties> {
        let Some(search_model) = self.search_model_name.as_deref() else {
            return Err(missing_search_model());
        };
        models::resolve_model_properties(
            search_model,
            self.index_settings.index_defaults.search_model_properties.as_ref(),
        )
    }

    /// Dimensionality of the indexing model, as needed by custom vector fields.
    pub fn model_dimensions(&self) -> Result<usize> {
        self.get_model_properties()?.require_dimensions()
    }
}
