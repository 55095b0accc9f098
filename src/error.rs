//! Error types shared by the entity and store layers.

use thiserror::Error;

/// Errors that can occur during catalog operations.
///
/// Every fallible operation in the crate reports one of these four kinds;
/// none of them is fatal and callers are expected to branch on the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rating out of range: {0} (expected 1-5)")]
    OutOfRange(u8),

    #[error("Referential violation: {0}")]
    ReferentialViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::DuplicateKey("chess".to_string());
        assert_eq!(format!("{}", err), "Duplicate key: chess");

        let err = CatalogError::OutOfRange(7);
        assert_eq!(format!("{}", err), "Rating out of range: 7 (expected 1-5)");
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            CatalogError::NotFound("x".to_string()),
            CatalogError::NotFound("x".to_string())
        );
        assert_ne!(
            CatalogError::NotFound("x".to_string()),
            CatalogError::DuplicateKey("x".to_string())
        );
    }
}
