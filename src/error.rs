use crate::tree::NodeId;
use thiserror::Error;

/// Error type for dictionary operations
#[derive(Debug, Error)]
pub enum DictError {
    /// Key string does not follow the key grammar
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// The path needs a namespace where a plain key already exists
    #[error("Cannot use '{key}' as a namespace: a key with that name already exists")]
    NamespaceConflict { key: String },

    /// The path needs a plain key where a namespace already exists
    #[error("Cannot use '{key}' as a key: a namespace with that name already exists")]
    NonNamespaceConflict { key: String },

    /// No full key with that name exists
    #[error("Key '{key}' not found")]
    KeyNotFound { key: String },

    /// Text can only be edited on full keys
    #[error("'{key}' is not a full key")]
    NotAFullKey { key: String },

    /// The requested operation is not valid for the node
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A node id that does not (or no longer) belongs to the dictionary
    #[error("Unknown node id {0:?}")]
    UnknownNode(NodeId),

    /// A validation report computed before the latest mutation
    #[error("Validation report is stale: the dictionary changed after it was computed")]
    StaleValidation,

    /// Document is not a translation dictionary at all
    #[error("Invalid dictionary document {source_name}: {reason}")]
    InvalidDocument { source_name: String, reason: String },

    /// Failed to write a document
    #[error("Failed to serialize dictionary: {0}")]
    Serialize(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl DictError {
    /// Create an InvalidKey error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidDocument error
    pub fn invalid_document(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a KeyNotFound error
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Structural conflicts abort only the current operation; the caller may retry
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::NamespaceConflict { .. } | Self::NonNamespaceConflict { .. }
        )
    }
}

/// Result type alias for DictError
pub type Result<T> = std::result::Result<T, DictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_error() {
        let err = DictError::invalid_key("a..b", "empty segment");
        let msg = err.to_string();
        assert!(msg.contains("a..b"));
        assert!(msg.contains("empty segment"));
    }

    #[test]
    fn test_invalid_document_error() {
        let err = DictError::invalid_document("app.txd", "root element is not <translation>");
        let msg = err.to_string();
        assert!(msg.contains("app.txd"));
        assert!(msg.contains("<translation>"));
    }

    #[test]
    fn test_conflicts_are_recoverable() {
        assert!(DictError::NamespaceConflict { key: "a".into() }.is_conflict());
        assert!(DictError::NonNamespaceConflict { key: "a".into() }.is_conflict());
        assert!(!DictError::key_not_found("a").is_conflict());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DictError = io_err.into();
        let msg = err.to_string();
        assert!(msg.contains("IO error"));
        assert!(msg.contains("file not found"));
    }
}
