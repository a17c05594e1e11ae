//! Size and count limits
//!
//! Limits are read once from the environment (or any other figment source)
//! and then passed by reference into every validator that needs them.

use crate::{Error, Result};
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DOC_BYTES: usize = 100_000;
pub const DEFAULT_MAX_DELETE_DOCS_COUNT: usize = 10_000;
pub const DEFAULT_EF_CONSTRUCTION_MAX_VALUE: u64 = 4096;

/// Environment prefix shared by every limit variable.
pub const ENV_PREFIX: &str = "MARQO_";

const ENV_KEYS: &[&str] = &[
    "max_doc_bytes",
    "max_searchable_tensor_attributes",
    "max_delete_docs_count",
    "ef_construction_max_value",
];

/// Immutable limits applied during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// `MARQO_MAX_DOC_BYTES`: ceiling on a document's serialized size
    pub max_doc_bytes: usize,
    /// `MARQO_MAX_SEARCHABLE_TENSOR_ATTRIBUTES`: unset means unlimited
    #[serde(default)]
    pub max_searchable_tensor_attributes: Option<usize>,
    /// `MARQO_MAX_DELETE_DOCS_COUNT`: used when a delete request passes no maximum
    pub max_delete_docs_count: usize,
    /// `MARQO_EF_CONSTRUCTION_MAX_VALUE`: upper bound for HNSW `ef_construction`
    pub ef_construction_max_value: u64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_doc_bytes: DEFAULT_MAX_DOC_BYTES,
            max_searchable_tensor_attributes: None,
            max_delete_docs_count: DEFAULT_MAX_DELETE_DOCS_COUNT,
            ef_construction_max_value: DEFAULT_EF_CONSTRUCTION_MAX_VALUE,
        }
    }
}

impl ValidationLimits {
    /// Read limits from `MARQO_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS));
        Self::from_figment(figment)
    }

    /// Extract limits from an arbitrary figment, e.g. one layered with a config file.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let limits: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        tracing::debug!(?limits, "validation limits loaded");
        Ok(limits)
    }

    #[must_use]
    pub fn with_max_doc_bytes(mut self, max_doc_bytes: usize) -> Self {
        self.max_doc_bytes = max_doc_bytes;
        self
    }

    #[must_use]
    pub fn with_max_searchable_tensor_attributes(mut self, max: Option<usize>) -> Self {
        self.max_searchable_tensor_attributes = max;
        self
    }

    #[must_use]
    pub fn with_max_delete_docs_count(mut self, max: usize) -> Self {
        self.max_delete_docs_count = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_when_env_unset() {
        Jail::expect_with(|_jail| {
            let limits = ValidationLimits::from_env().unwrap();
            assert_eq!(limits, ValidationLimits::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("MARQO_MAX_DOC_BYTES", "1234567");
            jail.set_env("MARQO_MAX_SEARCHABLE_TENSOR_ATTRIBUTES", "6");
            jail.set_env("MARQO_MAX_DELETE_DOCS_COUNT", "10");
            let limits = ValidationLimits::from_env().unwrap();
            assert_eq!(limits.max_doc_bytes, 1_234_567);
            assert_eq!(limits.max_searchable_tensor_attributes, Some(6));
            assert_eq!(limits.max_delete_docs_count, 10);
            assert_eq!(limits.ef_construction_max_value, DEFAULT_EF_CONSTRUCTION_MAX_VALUE);
            Ok(())
        });
    }

    #[test]
    fn test_unparseable_env_is_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env("MARQO_MAX_DOC_BYTES", "lots");
            let err = ValidationLimits::from_env().unwrap_err();
            assert!(matches!(err, Error::Config(_)));
            Ok(())
        });
    }
}
