//! Author record.

use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Store-assigned author identifier.
pub type AuthorId = i64;

/// Persisted author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    /// Display name, unique across all authors.
    pub name: String,
}

impl Author {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_author_name(&self.name)
    }
}

/// Author that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_author_name(&self.name)
    }
}

fn validate_author_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankAuthorName);
    }
    Ok(())
}
