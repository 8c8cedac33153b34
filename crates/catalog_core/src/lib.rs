//! Catalog core: author/book records, filtered listing, CSV export and bulk
//! JSON import over a SQLite record store.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError, LoggingConfig};
pub use error::{CatalogError, CatalogResult, EntityKind, InvalidInput};
pub use export::{CsvExport, ExportError};
pub use import::UploadResult;
pub use logging::{default_log_level, init_logging, LoggingError};
pub use mapper::{AuthorResponse, BookResponse};
pub use model::author::{Author, AuthorId, NewAuthor};
pub use model::book::{Book, BookDraft, BookId};
pub use model::ValidationError;
pub use query::criteria::BookCriteria;
pub use query::page::{PageRequest, Paginated, Slice, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use repo::author_repo::{AuthorRepository, SqliteAuthorRepository};
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::{RepoError, RepoResult};
pub use service::catalog_service::CatalogService;
pub use service::request::{AuthorRequest, BookListQuery, BookRequest};

/// SQLite-backed service borrowing one connection for both repositories.
pub type SqliteCatalogService<'conn> =
    CatalogService<SqliteAuthorRepository<'conn>, SqliteBookRepository<'conn>>;

/// Builds a [`SqliteCatalogService`] on a connection returned by `db::open_db*`.
pub fn sqlite_catalog(conn: &rusqlite::Connection) -> RepoResult<SqliteCatalogService<'_>> {
    Ok(CatalogService::new(
        SqliteAuthorRepository::try_new(conn)?,
        SqliteBookRepository::try_new(conn)?,
    ))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
