use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the validation gate.
///
/// The first five variants describe bad user input and should be turned into a
/// rejected request. `Internal`, `Contract` and `Config` mean the calling layer
/// (or the deployment) is wrong and must be fixed rather than reported back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid field name: {0}")]
    InvalidFieldName(String),

    #[error("Invalid document id: {0}")]
    InvalidDocumentId(String),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    #[error("Document too large: {0}")]
    DocTooLarge(String),

    #[error("Invalid index name: {0}")]
    InvalidIndexName(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Missing key: {0}")]
    MissingKey(String),

    #[error("Caller contract violated: {0}")]
    Contract(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid_arg<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArg(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Error::Internal(msg.into())
    }

    /// The bare message, without the kind prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            Error::InvalidFieldName(m)
            | Error::InvalidDocumentId(m)
            | Error::InvalidArg(m)
            | Error::DocTooLarge(m)
            | Error::InvalidIndexName(m)
            | Error::Internal(m)
            | Error::InvalidValue(m)
            | Error::MissingKey(m)
            | Error::Contract(m)
            | Error::Config(m) => m,
        }
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidFieldName(_) => "invalid_field_name",
            Error::InvalidDocumentId(_) => "invalid_document_id",
            Error::InvalidArg(_) => "invalid_argument",
            Error::DocTooLarge(_) => "doc_too_large",
            Error::InvalidIndexName(_) => "invalid_index_name",
            Error::Internal(_) => "internal",
            Error::InvalidValue(_) => "invalid_value",
            Error::MissingKey(_) => "missing_key",
            Error::Contract(_) => "contract_violation",
            Error::Config(_) => "invalid_configuration",
        }
    }

    /// True when the error was caused by the request content itself.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidFieldName(_)
                | Error::InvalidDocumentId(_)
                | Error::InvalidArg(_)
                | Error::DocTooLarge(_)
                | Error::InvalidIndexName(_)
                | Error::InvalidValue(_)
        )
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Error::DocTooLarge(_) => 413,
            _ if self.is_user_error() => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_map_to_client_status() {
        assert_eq!(Error::invalid_arg("bad").status_code(), 400);
        assert_eq!(Error::DocTooLarge("big".into()).status_code(), 413);
        assert_eq!(Error::internal("bug").status_code(), 500);
        assert_eq!(Error::Contract("bug".into()).status_code(), 500);
        assert!(!Error::MissingKey("__chunks".into()).is_user_error());
    }

    #[test]
    fn test_message_strips_kind_prefix() {
        let err = Error::InvalidFieldName("field name can't be empty".into());
        assert_eq!(err.message(), "field name can't be empty");
        assert_eq!(err.to_string(), "Invalid field name: field name can't be empty");
        assert_eq!(err.code(), "invalid_field_name");
    }
}
