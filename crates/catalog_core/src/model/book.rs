//! Book record and its write shape.
//!
//! # Invariants
//! - `title` is never blank.
//! - `year_published`, when set, lies in `MIN_YEAR_PUBLISHED..=MAX_YEAR_PUBLISHED`.
//! - `genres` keeps caller order; duplicates are allowed.

use super::author::{Author, AuthorId};
use super::{ValidationError, MAX_YEAR_PUBLISHED, MIN_YEAR_PUBLISHED};
use serde::{Deserialize, Serialize};

/// Store-assigned book identifier.
pub type BookId = i64;

/// Persisted book joined with its current author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: Author,
    pub year_published: Option<i32>,
    pub genres: Vec<String>,
}

/// Full replacement content for a book, used by both insert and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author_id: AuthorId,
    pub year_published: Option<i32>,
    pub genres: Vec<String>,
}

impl BookDraft {
    /// Checks title and year constraints.
    ///
    /// Author existence is a store concern and is not checked here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        if let Some(year) = self.year_published {
            if !(MIN_YEAR_PUBLISHED..=MAX_YEAR_PUBLISHED).contains(&year) {
                return Err(ValidationError::YearOutOfRange(year));
            }
        }
        Ok(())
    }
}
