//! Cursor pagination over `created_at`

use chrono::{DateTime, Utc};

use super::validation::ValidationError;

/// Maximum posts per page
pub const MAX_LIMIT: u32 = 100;

/// Default posts per page
pub const DEFAULT_LIMIT: u32 = 20;

/// Page request: posts strictly after `after`, at most `limit` of them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Exclusive `created_at` cursor
    pub after: Option<DateTime<Utc>>,
    limit: u32,
}

impl PageRequest {
    /// Create a page request; `limit` is capped at 100. A zero limit asks
    /// for an empty page.
    pub fn new(after: Option<DateTime<Utc>>, limit: u32) -> Self {
        Self {
            after,
            limit: limit.min(MAX_LIMIT),
        }
    }

    /// Build from optional client arguments. Negative limits are rejected.
    pub fn from_args(
        after: Option<DateTime<Utc>>,
        limit: Option<i32>,
    ) -> Result<Self, ValidationError> {
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(l) => {
                u32::try_from(l).map_err(|_| ValidationError::Negative { field: "limit" })?
            }
        };
        Ok(Self::new(after, limit))
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether a post created at `created_at` lies after the cursor.
    pub fn admits(&self, created_at: DateTime<Utc>) -> bool {
        self.after.map_or(true, |cursor| created_at > cursor)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            after: None,
            limit: DEFAULT_LIMIT,
        }
    }
}
