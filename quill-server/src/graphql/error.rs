//! Resolver error type with stable client codes
//!
//! Every resolver error reaches the client as an `async_graphql::Error`
//! carrying `extensions.code`. Internal details are logged, never sent.

use async_graphql::ErrorExtensions;
use async_graphql::ID;
use quill_core::models::ValidationError;
use uuid::Uuid;

use crate::db::DbError;
use crate::password::PasswordError;

pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred on the server. \
     Please try again later or contact support if the issue persists.";

/// Boundary error for resolvers.
///
/// Deliberately has no `Display` impl: async-graphql converts any
/// `Display` type into a code-less error, which would shadow the
/// conversion below.
#[derive(Debug)]
pub enum ApiError {
    /// NOT_FOUND
    NotFound { resource: &'static str, id: String },

    /// BAD_USER_INPUT
    Validation(ValidationError),

    /// CONFLICT
    Conflict { constraint: String },

    /// INTERNAL_SERVER_ERROR, logged
    Internal { message: String },
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "BAD_USER_INPUT",
            Self::Conflict { .. } => "CONFLICT",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Message safe to show a client.
    pub fn client_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => format!("{} '{}' not found", capitalize(resource), id),
            Self::Validation(e) => e.to_string(),
            Self::Conflict { constraint } => conflict_message(constraint).to_owned(),
            Self::Internal { .. } => INTERNAL_MESSAGE.to_owned(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        "users_username_key" => "A user with this username already exists",
        "tags_name_key" => "A tag with this name already exists",
        _ => "The request conflicts with existing data",
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::Validation(e) => Self::Validation(e),
            DbError::Conflict { constraint } => Self::Conflict { constraint },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl From<ApiError> for async_graphql::Error {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Internal { message } => tracing::error!("Internal error: {}", message),
            ApiError::Conflict { constraint } => {
                tracing::debug!(constraint = %constraint, "constraint violation")
            }
            _ => {}
        }
        let code = err.code();
        async_graphql::Error::new(err.client_message()).extend_with(|_, e| e.set("code", code))
    }
}

/// Parse a post or user id. A non-UUID names no row, so it is `NotFound`.
pub fn parse_uuid(resource: &'static str, id: &ID) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id.as_str()).map_err(|_| ApiError::NotFound {
        resource,
        id: id.to_string(),
    })
}
