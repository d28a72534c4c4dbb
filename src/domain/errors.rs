//! Domain errors for the rivalscope pipeline.

use thiserror::Error;

/// Domain-level errors that can occur while running the insight pipeline.
///
/// Generation-service failures are deliberately absent: those degrade a single
/// stage to its fallback value instead of surfacing here.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Pipeline trace incomplete: stage '{0}' has no completion timestamp")]
    IncompleteTrace(&'static str),

    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_map_to_variants() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(DomainError::from(json_err), DomainError::SerializationError(_)));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        match DomainError::from(io_err) {
            DomainError::StorageError(msg) => assert!(msg.contains("read-only")),
            other => panic!("expected StorageError, got {other:?}"),
        }
    }
}
