//! Catalog domain model.
//!
//! # Responsibility
//! - Define the persisted author/book records and their write shapes.
//! - Own field-level validation shared by the service and repositories.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never change afterwards.
//! - A book always references exactly one author.

pub mod author;
pub mod book;

use thiserror::Error;

/// Earliest accepted publication year.
pub const MIN_YEAR_PUBLISHED: i32 = 1000;
/// Latest accepted publication year.
pub const MAX_YEAR_PUBLISHED: i32 = 9999;

/// Field-level constraint violation on an author or book.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("author name must not be blank")]
    BlankAuthorName,
    #[error("book title must not be blank")]
    BlankTitle,
    #[error("book author id is required")]
    MissingAuthorId,
    #[error("year published {0} is outside 1000..=9999")]
    YearOutOfRange(i32),
}
