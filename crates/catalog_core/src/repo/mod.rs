//! Record store contracts and their SQLite implementations.
//!
//! # Responsibility
//! - Define the narrow query contract the catalog service depends on.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Repository writes run `validate()` before any SQL mutation.
//! - "Not found" is an absent result (`None` / `false`), never an error.
//! - Store-level constraint violations surface as semantic variants
//!   (`DuplicateAuthorName`, `MissingAuthor`) instead of raw SQLite errors.

pub mod author_repo;
pub mod book_repo;

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{DbError, FOLD_CASE_FUNCTION};
use crate::model::author::AuthorId;
use crate::model::ValidationError;
use rusqlite::{Connection, ErrorCode};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("author name already stored: `{0}`")]
    DuplicateAuthorName(String),
    #[error("referenced author does not exist: {0}")]
    MissingAuthor(AuthorId),
    #[error("invalid persisted catalog data: {0}")]
    InvalidData(String),
    #[error("connection schema version {actual_version} does not match expected {expected_version}; open it with `open_db`")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("SQL function `{0}` is not registered on this connection")]
    MissingSqlFunction(&'static str),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

const REQUIRED_TABLES: &[&str] = &["authors", "books", "book_genres"];

/// Verifies a connection went through `open_db` before repositories use it.
///
/// Checks the schema version, the catalog tables and the case-folding function.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in REQUIRED_TABLES {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    conn.query_row(&format!("SELECT {FOLD_CASE_FUNCTION}('');"), [], |_| Ok(()))
        .map_err(|_| RepoError::MissingSqlFunction(FOLD_CASE_FUNCTION))?;

    Ok(())
}

/// Extended result code of a failed statement, when it was a constraint failure.
pub(crate) fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(failure.extended_code)
        }
        _ => None,
    }
}

/// Converts a row count read from SQLite into `u64`.
pub(crate) fn count_to_u64(count: i64) -> RepoResult<u64> {
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
}

/// Converts a `u64` limit/offset into the `i64` SQLite binds.
pub(crate) fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
