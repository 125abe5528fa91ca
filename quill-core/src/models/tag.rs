//! Tags and tag name validation

use super::validation::{bounded_text, ValidationError};

/// Maximum length for tag names
const MAX_TAG_NAME_LEN: usize = 64;

/// Tag identifier as stored (`BIGSERIAL`)
pub type TagId = i64;

/// Largest tag id a client may reference.
///
/// Referencing an unknown id creates a tag row with that id and moves the
/// id sequence past it, so the bound keeps the rest of the sequence usable.
pub const MAX_TAG_ID: TagId = i32::MAX as TagId;

/// Tag shared by many posts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Name given to a tag row created from a bare identifier.
    pub fn placeholder_name(id: TagId) -> String {
        id.to_string()
    }
}

/// Validated tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    /// Create a tag name. Surrounding whitespace is trimmed.
    ///
    /// # Example
    /// ```
    /// use quill_core::models::TagName;
    ///
    /// assert_eq!(TagName::new("  rust ").unwrap().as_str(), "rust");
    /// assert!(TagName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded_text(s, "tag name", MAX_TAG_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check that `id` lies in `1..=MAX_TAG_ID`.
pub fn check_tag_id(id: TagId) -> Result<TagId, ValidationError> {
    if (1..=MAX_TAG_ID).contains(&id) {
        Ok(id)
    } else {
        Err(invalid_tag_id(id.to_string()))
    }
}

/// Parse a tag identifier supplied by a client.
pub fn parse_tag_id(raw: &str) -> Result<TagId, ValidationError> {
    match raw.trim().parse::<TagId>() {
        Ok(id) => check_tag_id(id).map_err(|_| invalid_tag_id(raw.to_owned())),
        Err(_) => Err(invalid_tag_id(raw.to_owned())),
    }
}

fn invalid_tag_id(value: String) -> ValidationError {
    ValidationError::InvalidId {
        field: "tag id",
        value,
    }
}
