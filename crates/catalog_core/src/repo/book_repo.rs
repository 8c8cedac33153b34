//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist books together with their ordered genre list.
//! - Serve filtered listings in the fixed `title ASC, id ASC` order.
//!
//! # Invariants
//! - Book rows and their genres are written in one transaction.
//! - Genre order is preserved through `book_genres.position`.
//! - Every loaded book carries its current author (inner join).

use super::{
    constraint_code, count_to_u64, ensure_connection_ready, to_sql_int, RepoError, RepoResult,
};
use crate::model::author::Author;
use crate::model::book::{Book, BookDraft, BookId};
use crate::query::criteria::BookCriteria;
use crate::query::page::{PageRequest, Slice};
use crate::query::BOOK_ORDER_BY;
use rusqlite::types::Value;
use rusqlite::{
    ffi, params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};

const BOOK_SELECT_SQL: &str = "SELECT
    b.id AS id,
    b.title AS title,
    b.year_published AS year_published,
    a.id AS author_id,
    a.name AS author_name
FROM books b
JOIN authors a ON a.id = b.author_id";

/// Store operations the catalog needs for books.
pub trait BookRepository {
    fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn exists_by_id(&self, id: BookId) -> RepoResult<bool>;
    /// Lists one page of books matching `criteria`, plus the total match count.
    fn find_page(&self, criteria: &BookCriteria, page: &PageRequest) -> RepoResult<Slice<Book>>;
    /// Lists every book matching `criteria` in listing order.
    fn find_all(&self, criteria: &BookCriteria) -> RepoResult<Vec<Book>>;
    /// Inserts a book and returns the stored record.
    fn insert(&self, book: &BookDraft) -> RepoResult<Book>;
    /// Replaces every field of an existing book. Returns `None` when the id is
    /// unknown.
    fn update(&self, id: BookId, book: &BookDraft) -> RepoResult<Option<Book>>;
    /// Returns `false` when the id is unknown.
    fn delete_by_id(&self, id: BookId) -> RepoResult<bool>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_books(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            let mut book = parse_book_row(row)?;
            book.genres = load_genres(self.conn, book.id)?;
            books.push(book);
        }

        Ok(books)
    }

    fn read_back(&self, id: BookId) -> RepoResult<Book> {
        self.find_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("book {id} not found in read-back after write"))
        })
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn find_by_id(&self, id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE b.id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;

        match book {
            Some(mut book) => {
                book.genres = load_genres(self.conn, book.id)?;
                Ok(Some(book))
            }
            None => Ok(None),
        }
    }

    fn exists_by_id(&self, id: BookId) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM books WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn find_page(&self, criteria: &BookCriteria, page: &PageRequest) -> RepoResult<Slice<Book>> {
        let predicate = criteria.to_sql();

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM books b WHERE {};", predicate.clause),
            params_from_iter(predicate.params.iter()),
            |row| row.get(0),
        )?;

        let mut bind_values = predicate.params;
        bind_values.push(Value::Integer(to_sql_int(page.limit())));
        bind_values.push(Value::Integer(to_sql_int(page.offset())));
        let items = self.query_books(
            &format!(
                "{BOOK_SELECT_SQL} WHERE {} ORDER BY {BOOK_ORDER_BY} LIMIT ? OFFSET ?;",
                predicate.clause
            ),
            bind_values,
        )?;

        Ok(Slice {
            items,
            total: count_to_u64(total)?,
        })
    }

    fn find_all(&self, criteria: &BookCriteria) -> RepoResult<Vec<Book>> {
        let predicate = criteria.to_sql();
        self.query_books(
            &format!(
                "{BOOK_SELECT_SQL} WHERE {} ORDER BY {BOOK_ORDER_BY};",
                predicate.clause
            ),
            predicate.params,
        )
    }

    fn insert(&self, book: &BookDraft) -> RepoResult<Book> {
        book.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO books (title, author_id, year_published) VALUES (?1, ?2, ?3);",
            params![book.title.as_str(), book.author_id, book.year_published],
        )
        .map_err(|err| map_author_reference(err, book))?;
        let id = tx.last_insert_rowid();
        replace_genres(&tx, id, &book.genres)?;
        tx.commit()?;

        self.read_back(id)
    }

    fn update(&self, id: BookId, book: &BookDraft) -> RepoResult<Option<Book>> {
        book.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx
            .execute(
                "UPDATE books
                 SET
                    title = ?1,
                    author_id = ?2,
                    year_published = ?3
                 WHERE id = ?4;",
                params![book.title.as_str(), book.author_id, book.year_published, id],
            )
            .map_err(|err| map_author_reference(err, book))?;

        if changed == 0 {
            return Ok(None);
        }

        replace_genres(&tx, id, &book.genres)?;
        tx.commit()?;

        self.read_back(id).map(Some)
    }

    fn delete_by_id(&self, id: BookId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: Author {
            id: row.get("author_id")?,
            name: row.get("author_name")?,
        },
        year_published: row.get("year_published")?,
        genres: Vec::new(),
    })
}

fn load_genres(conn: &Connection, book_id: BookId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT genre FROM book_genres WHERE book_id = ?1 ORDER BY position ASC;",
    )?;
    let genres = stmt
        .query_map([book_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(genres)
}

fn replace_genres(conn: &Connection, book_id: BookId, genres: &[String]) -> RepoResult<()> {
    conn.execute("DELETE FROM book_genres WHERE book_id = ?1;", [book_id])?;

    let mut stmt = conn.prepare_cached(
        "INSERT INTO book_genres (book_id, position, genre) VALUES (?1, ?2, ?3);",
    )?;
    for (position, genre) in genres.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| RepoError::InvalidData(format!("genre position {position} overflow")))?;
        stmt.execute(params![book_id, position, genre.as_str()])?;
    }

    Ok(())
}

fn map_author_reference(err: rusqlite::Error, book: &BookDraft) -> RepoError {
    if constraint_code(&err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
        return RepoError::MissingAuthor(book.author_id);
    }
    err.into()
}
