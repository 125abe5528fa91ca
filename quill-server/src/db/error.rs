//! Database error type and sqlx error classification

use quill_core::error::BoxError;
use quill_core::models::ValidationError;
use quill_core::StoreError;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("constraint violation: {constraint}")]
    Conflict { constraint: String },

    #[error("invalid input: {0}")]
    Validation(ValidationError),

    #[error("transaction failed: {0}")]
    Transaction(BoxError),
}

/// Name of the unique or foreign key constraint behind `err`, if any.
fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() =>
        {
            Some(db.constraint().unwrap_or("unknown").to_owned())
        }
        _ => None,
    }
}

/// Classify a sqlx error for code running behind a [`quill_core::PostStore`].
pub fn store_error(err: sqlx::Error) -> StoreError {
    match violated_constraint(&err) {
        Some(constraint) => StoreError::constraint(constraint),
        None => StoreError::transaction(err),
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match violated_constraint(&err) {
            Some(constraint) => Self::Conflict { constraint },
            None => Self::Sqlx(err),
        }
    }
}

impl From<StoreError> for DbError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { resource, id } => Self::NotFound { resource, id },
            StoreError::ConstraintViolation { constraint } => Self::Conflict { constraint },
            StoreError::Validation(e) => Self::Validation(e),
            StoreError::TransactionFailure { source } => match source.downcast::<sqlx::Error>() {
                Ok(sqlx_err) => Self::Sqlx(*sqlx_err),
                Err(other) => Self::Transaction(other),
            },
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}
