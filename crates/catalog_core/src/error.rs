//! Error kinds surfaced by catalog operations.
//!
//! # Invariants
//! - `NotFound`, `Conflict`, `InvalidInput` and `ValidationFailed` are
//!   expected outcomes that callers turn into typed failures.
//! - `Store` and `Export` are structural failures and propagate unchanged.

use crate::export::ExportError;
use crate::model::ValidationError;
use crate::repo::RepoError;
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Record type named by a `NotFound` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Author,
    Book,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Author => f.write_str("author"),
            Self::Book => f.write_str("book"),
        }
    }
}

/// Caller-supplied input that cannot be processed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("page and size must both be >= 1, got page={page} size={size}")]
    PageRequest { page: u32, size: u32 },
    #[error("malformed batch payload: {0}")]
    MalformedBatch(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: i64 },
    #[error("author with name `{0}` already exists")]
    Conflict(String),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),
    #[error("catalog store failure: {0}")]
    Store(#[source] RepoError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl CatalogError {
    pub fn author_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: EntityKind::Author,
            id,
        }
    }

    pub fn book_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: EntityKind::Book,
            id,
        }
    }

    /// Whether the error is an expected per-request outcome rather than a
    /// store/infrastructure fault.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::Export(_))
    }

    /// Stable short code for logs and outer layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InvalidInput(_) => "invalid_input",
            Self::ValidationFailed(_) => "validation_failed",
            Self::Store(_) => "store_failure",
            Self::Export(_) => "export_failure",
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::ValidationFailed(err),
            RepoError::DuplicateAuthorName(name) => Self::Conflict(name),
            RepoError::MissingAuthor(id) => Self::author_not_found(id),
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogError, InvalidInput};
    use crate::model::ValidationError;
    use crate::repo::RepoError;

    #[test]
    fn repository_semantic_errors_map_to_recoverable_kinds() {
        let conflict = CatalogError::from(RepoError::DuplicateAuthorName("Ann".to_string()));
        assert!(matches!(&conflict, CatalogError::Conflict(name) if name == "Ann"));
        assert!(conflict.is_recoverable());

        let invalid = CatalogError::from(RepoError::Validation(ValidationError::BlankTitle));
        assert_eq!(invalid.code(), "validation_failed");
        assert!(invalid.is_recoverable());
    }

    #[test]
    fn store_faults_are_not_recoverable() {
        let err = CatalogError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(err.code(), "store_failure");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn not_found_message_names_entity() {
        assert_eq!(
            CatalogError::book_not_found(42).to_string(),
            "book not found: 42"
        );
        let err = CatalogError::from(InvalidInput::PageRequest { page: 0, size: 1 });
        assert_eq!(err.code(), "invalid_input");
    }
}
