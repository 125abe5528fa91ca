//! Structured error types for quill-core.
//!
//! Store implementations classify their backend failures into these
//! variants so callers can tell a missing row from a broken transaction.

use thiserror::Error;

use crate::models::ValidationError;

/// Boxed backend error carried by [`StoreError::TransactionFailure`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error raised by post/tag store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Requested post, user or tag does not exist
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Unique or foreign key constraint rejected a write
    #[error("constraint violation: {constraint}")]
    ConstraintViolation { constraint: String },

    /// Any other failure inside a multi-step write; the transaction is rolled back
    #[error("transaction failed: {source}")]
    TransactionFailure {
        #[source]
        source: BoxError,
    },

    /// Input rejected before touching the store
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(constraint: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            constraint: constraint.into(),
        }
    }

    /// Wrap a backend error as a transaction failure
    pub fn transaction(source: impl Into<BoxError>) -> Self {
        Self::TransactionFailure {
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::not_found("post", "abc");
        assert_eq!(err.to_string(), "post 'abc' not found");
        assert!(err.is_not_found());

        let err = StoreError::constraint("users_username_key");
        assert_eq!(
            err.to_string(),
            "constraint violation: users_username_key"
        );

        let err = StoreError::transaction("connection reset");
        assert!(err.to_string().starts_with("transaction failed"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_validation_conversion() {
        let err: StoreError = ValidationError::Empty { field: "title" }.into();
        assert_eq!(err.to_string(), "title cannot be empty");
    }
}
