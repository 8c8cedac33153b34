//! Author repository contract and SQLite implementation.
//!
//! # Invariants
//! - Name lookups are exact (binary collation, no trimming or case folding).
//! - The `authors.name` unique index backs the service-level uniqueness check.

use super::{
    constraint_code, count_to_u64, ensure_connection_ready, to_sql_int, RepoError, RepoResult,
};
use crate::model::author::{Author, AuthorId, NewAuthor};
use crate::query::page::{PageRequest, Slice};
use crate::query::AUTHOR_ORDER_BY;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT id, name FROM authors";

/// Store operations the catalog needs for authors.
pub trait AuthorRepository {
    fn find_by_id(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn find_by_exact_name(&self, name: &str) -> RepoResult<Option<Author>>;
    fn exists_by_id(&self, id: AuthorId) -> RepoResult<bool>;
    fn exists_by_exact_name(&self, name: &str) -> RepoResult<bool>;
    /// Lists one page of authors ordered by name, then id.
    fn find_page(&self, page: &PageRequest) -> RepoResult<Slice<Author>>;
    /// Inserts a new author and returns it with its assigned id.
    fn insert(&self, author: &NewAuthor) -> RepoResult<Author>;
    /// Rewrites an existing author. Returns `false` when the id is unknown.
    fn update(&self, author: &Author) -> RepoResult<bool>;
    /// Deletes an author (and, through the schema, its books).
    /// Returns `false` when the id is unknown.
    fn delete_by_id(&self, id: AuthorId) -> RepoResult<bool>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn find_by_id(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_author_row,
            )
            .optional()?;
        Ok(author)
    }

    fn find_by_exact_name(&self, name: &str) -> RepoResult<Option<Author>> {
        let author = self
            .conn
            .query_row(
                &format!("{AUTHOR_SELECT_SQL} WHERE name = ?1;"),
                [name],
                parse_author_row,
            )
            .optional()?;
        Ok(author)
    }

    fn exists_by_id(&self, id: AuthorId) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn exists_by_exact_name(&self, name: &str) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM authors WHERE name = ?1);",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn find_page(&self, page: &PageRequest) -> RepoResult<Slice<Author>> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))?;

        let mut stmt = self.conn.prepare(&format!(
            "{AUTHOR_SELECT_SQL} ORDER BY {AUTHOR_ORDER_BY} LIMIT ?1 OFFSET ?2;"
        ))?;
        let items = stmt
            .query_map(
                params![to_sql_int(page.limit()), to_sql_int(page.offset())],
                parse_author_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Slice {
            items,
            total: count_to_u64(total)?,
        })
    }

    fn insert(&self, author: &NewAuthor) -> RepoResult<Author> {
        author.validate()?;

        self.conn
            .execute(
                "INSERT INTO authors (name) VALUES (?1);",
                [author.name.as_str()],
            )
            .map_err(|err| map_name_conflict(err, &author.name))?;

        Ok(Author {
            id: self.conn.last_insert_rowid(),
            name: author.name.clone(),
        })
    }

    fn update(&self, author: &Author) -> RepoResult<bool> {
        author.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE authors SET name = ?1 WHERE id = ?2;",
                params![author.name.as_str(), author.id],
            )
            .map_err(|err| map_name_conflict(err, &author.name))?;

        Ok(changed > 0)
    }

    fn delete_by_id(&self, id: AuthorId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_author_row(row: &Row<'_>) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn map_name_conflict(err: rusqlite::Error, name: &str) -> RepoError {
    if constraint_code(&err) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) {
        return RepoError::DuplicateAuthorName(name.to_string());
    }
    err.into()
}
