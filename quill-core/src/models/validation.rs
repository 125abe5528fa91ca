//! Validation error types

use std::fmt;

/// Validation error for domain input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field is shorter than the minimum length
    TooShort { field: &'static str, min: usize },

    /// String doesn't match required format (e.g. username, email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Identifier could not be parsed
    InvalidId { field: &'static str, value: String },

    /// Count or size below zero
    Negative { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidId { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::Negative { field } => write!(f, "{} cannot be negative", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `raw` and check it is non-empty and at most `max` characters.
pub(crate) fn bounded_text(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 256,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 256 characters"
        );

        let err = ValidationError::InvalidId {
            field: "tag id",
            value: "abc".into(),
        };
        assert_eq!(err.to_string(), "invalid tag id value: 'abc'");
    }

    #[test]
    fn bounded_text_trims_and_counts_chars() {
        assert_eq!(bounded_text("  hi  ", "x", 2).unwrap(), "hi");
        // multi-byte characters count once
        assert_eq!(bounded_text("héé", "x", 3).unwrap(), "héé");
        assert!(matches!(
            bounded_text("   ", "x", 3),
            Err(ValidationError::Empty { field: "x" })
        ));
        assert!(matches!(
            bounded_text("abcd", "x", 3),
            Err(ValidationError::TooLong { max: 3, .. })
        ));
    }
}
