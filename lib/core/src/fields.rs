//! Reserved field names
//!
//! Every name, prefix and pattern that user documents may not claim lives here,
//! so the naming rules can be audited in one place.

/// Name of the document id field.
pub const ID_FIELD: &str = "_id";

/// Prefix marking a property as embedding-vector backed.
/// The user's field name is appended to it.
pub const VECTOR_PREFIX: &str = "__vector_";

/// Property under which per-chunk sub-properties are nested in index metadata.
pub const CHUNKS: &str = "__chunks";

/// Separator pattern used internally to address nested chunk properties.
pub const CHUNK_NESTING_PATTERN: &str = ".__";

pub const FIELD_NAME: &str = "__field_name";
pub const FIELD_CONTENT: &str = "__field_content";
pub const DOC_CHUNK_RELATION: &str = "__doc_chunk_relation";
pub const CHUNK_IDS: &str = "__chunk_ids";
pub const KNN_FIELD: &str = "__vector_marqo_knn_field";
pub const HIGHLIGHTS: &str = "_highlights";
pub const SCORE: &str = "_score";
pub const TENSOR_FACETS: &str = "_tensor_facets";
pub const EMBEDDING: &str = "_embedding";
pub const FOUND: &str = "_found";

/// Names that are reserved for the system's own storage and output fields.
pub const PROTECTED_FIELD_NAMES: &[&str] = &[
    FIELD_NAME,
    FIELD_CONTENT,
    DOC_CHUNK_RELATION,
    CHUNK_IDS,
    VECTOR_PREFIX,
    KNN_FIELD,
    CHUNKS,
    HIGHLIGHTS,
    SCORE,
    TENSOR_FACETS,
    EMBEDDING,
    FOUND,
];

pub fn is_protected(name: &str) -> bool {
    PROTECTED_FIELD_NAMES.contains(&name)
}

/// Protected names plus the id field; a vector name may not wrap any of them.
pub fn is_system_field(name: &str) -> bool {
    name == ID_FIELD || is_protected(name)
}

/// Index names owned by the backing search engine.
pub const RESERVED_INDEX_NAMES: &[&str] = &[
    ".opendistro_security",
    ".opendistro-job-scheduler-lock",
    ".opendistro-reports-instances",
    ".opendistro-reports-definitions",
    ".opendistro_alerting_config",
    ".kibana",
    ".plugins-ml-config",
    "bulk",
];

/// Index name prefixes owned by the backing search engine.
pub const RESERVED_INDEX_PREFIXES: &[&str] = &[
    "security-auditlog-",
    ".opendistro-alerting-config-",
    ".opendistro-alerting-alert",
    ".opendistro-anomaly",
    ".opendistro-reports-",
    ".opendistro-ism",
    ".kibana",
    ".opensearch",
    ".plugins-",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_names() {
        assert!(is_protected("__field_name"));
        assert!(is_protected("_highlights"));
        assert!(!is_protected("_id"));
        assert!(is_system_field("_id"));
        assert!(!is_system_field("title"));
    }

    #[test]
    fn test_knn_field_carries_vector_prefix() {
        assert!(KNN_FIELD.starts_with(VECTOR_PREFIX));
    }
}
