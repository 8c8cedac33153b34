//! Catalog use-case service.
//!
//! # Responsibility
//! - Single-item author/book CRUD with existence and uniqueness checks.
//! - Filtered, paginated book listing; CSV export; bulk JSON import.
//!
//! # Invariants
//! - Missing referenced records fail with `NotFound`; duplicate author names
//!   fail with `Conflict`. There is no default-author fallback.
//! - Book updates replace every field; they are never partial.
//! - The service stays storage-agnostic and only talks to repository traits.

use crate::error::{CatalogError, CatalogResult};
use crate::export::CsvExport;
use crate::import::{import_items, parse_batch, UploadResult};
use crate::mapper::{AuthorResponse, BookResponse};
use crate::model::author::{Author, AuthorId};
use crate::model::book::BookId;
use crate::query::criteria::BookCriteria;
use crate::query::page::{PageRequest, Paginated};
use crate::repo::author_repo::AuthorRepository;
use crate::repo::book_repo::BookRepository;
use crate::service::request::{AuthorRequest, BookListQuery, BookRequest};
use log::{info, warn};

/// Service facade over author and book repositories.
pub struct CatalogService<A: AuthorRepository, B: BookRepository> {
    authors: A,
    books: B,
}

impl<A: AuthorRepository, B: BookRepository> CatalogService<A, B> {
    /// Creates a service using the provided repository implementations.
    pub fn new(authors: A, books: B) -> Self {
        Self { authors, books }
    }

    /// Creates an author.
    ///
    /// # Errors
    /// - `ValidationFailed` for a blank name.
    /// - `Conflict` when an author with the exact same name exists.
    pub fn create_author(&self, request: AuthorRequest) -> CatalogResult<AuthorResponse> {
        let author = request.into_new_author()?;
        if self.authors.exists_by_exact_name(&author.name)? {
            return Err(CatalogError::Conflict(author.name));
        }

        let created = self.authors.insert(&author)?;
        info!(
            "event=author_create module=service status=ok author_id={}",
            created.id
        );
        Ok(created.into())
    }

    /// Renames an author in place.
    ///
    /// Keeping the current name never conflicts.
    pub fn update_author(
        &self,
        id: AuthorId,
        request: AuthorRequest,
    ) -> CatalogResult<AuthorResponse> {
        let renamed = request.into_new_author()?;
        let current = self
            .authors
            .find_by_id(id)?
            .ok_or_else(|| CatalogError::author_not_found(id))?;

        if current.name != renamed.name && self.authors.exists_by_exact_name(&renamed.name)? {
            return Err(CatalogError::Conflict(renamed.name));
        }

        let updated = Author {
            id,
            name: renamed.name,
        };
        if !self.authors.update(&updated)? {
            return Err(CatalogError::author_not_found(id));
        }

        info!("event=author_update module=service status=ok author_id={id}");
        Ok(updated.into())
    }

    /// Deletes an author together with every book that references it.
    pub fn delete_author(&self, id: AuthorId) -> CatalogResult<()> {
        if !self.authors.delete_by_id(id)? {
            return Err(CatalogError::author_not_found(id));
        }
        info!("event=author_delete module=service status=ok author_id={id} cascade=books");
        Ok(())
    }

    pub fn get_author(&self, id: AuthorId) -> CatalogResult<AuthorResponse> {
        self.find_author(id)?
            .ok_or_else(|| CatalogError::author_not_found(id))
    }

    /// Looks an author up without treating absence as an error.
    pub fn find_author(&self, id: AuthorId) -> CatalogResult<Option<AuthorResponse>> {
        Ok(self.authors.find_by_id(id)?.map(AuthorResponse::from))
    }

    /// Lists authors ordered by name, then id.
    pub fn list_authors(&self, page: u32, size: u32) -> CatalogResult<Paginated<AuthorResponse>> {
        let request = PageRequest::new(page, size)?;
        let slice = self.authors.find_page(&request)?;
        Ok(Paginated::from_slice(slice, &request, AuthorResponse::from))
    }

    /// Creates a book for an existing author.
    ///
    /// # Errors
    /// - `ValidationFailed` for a blank title, missing author id or a year
    ///   outside four digits.
    /// - `NotFound` when the author does not exist.
    pub fn create_book(&self, request: BookRequest) -> CatalogResult<BookResponse> {
        let draft = request.into_draft()?;
        if !self.authors.exists_by_id(draft.author_id)? {
            return Err(CatalogError::author_not_found(draft.author_id));
        }

        let created = self.books.insert(&draft)?;
        info!(
            "event=book_create module=service status=ok book_id={} author_id={}",
            created.id, draft.author_id
        );
        Ok(created.into())
    }

    /// Replaces title, author, year and genres of an existing book.
    pub fn update_book(&self, id: BookId, request: BookRequest) -> CatalogResult<BookResponse> {
        let draft = request.into_draft()?;
        if !self.books.exists_by_id(id)? {
            return Err(CatalogError::book_not_found(id));
        }
        if !self.authors.exists_by_id(draft.author_id)? {
            return Err(CatalogError::author_not_found(draft.author_id));
        }

        let updated = self
            .books
            .update(id, &draft)?
            .ok_or_else(|| CatalogError::book_not_found(id))?;
        info!("event=book_update module=service status=ok book_id={id}");
        Ok(updated.into())
    }

    pub fn delete_book(&self, id: BookId) -> CatalogResult<()> {
        if !self.books.delete_by_id(id)? {
            return Err(CatalogError::book_not_found(id));
        }
        info!("event=book_delete module=service status=ok book_id={id}");
        Ok(())
    }

    pub fn get_book(&self, id: BookId) -> CatalogResult<BookResponse> {
        self.books
            .find_by_id(id)?
            .map(BookResponse::from)
            .ok_or_else(|| CatalogError::book_not_found(id))
    }

    /// Lists books matching the query's filters, one page at a time.
    ///
    /// Zero matches yield an empty page with `total_pages == 0`.
    pub fn list_books(&self, query: &BookListQuery) -> CatalogResult<Paginated<BookResponse>> {
        self.search_books(&query.criteria(), query.page, query.size)
    }

    /// Same as [`Self::list_books`] with criteria and paging passed apart.
    pub fn search_books(
        &self,
        criteria: &BookCriteria,
        page: u32,
        size: u32,
    ) -> CatalogResult<Paginated<BookResponse>> {
        let request = PageRequest::new(page, size)?;
        let slice = self.books.find_page(criteria, &request)?;
        Ok(Paginated::from_slice(slice, &request, BookResponse::from))
    }

    /// Every book in listing order, unfiltered and unpaginated.
    pub fn list_all_books(&self) -> CatalogResult<Vec<BookResponse>> {
        self.filtered_books(&BookCriteria::default())
    }

    /// Renders every book matching `criteria` as a CSV report.
    pub fn export_books_csv(&self, criteria: &BookCriteria) -> CatalogResult<Vec<u8>> {
        let books = self.filtered_books(criteria)?;
        let bytes = books.to_csv_bytes()?;
        info!(
            "event=book_export module=service status=ok format=csv rows={} bytes={}",
            books.len(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Imports a JSON array of book objects, creating each independently.
    ///
    /// # Errors
    /// - `InvalidInput` when the payload is not a JSON array of objects; no
    ///   book is created in that case.
    /// - Store failures abort the import and propagate.
    pub fn import_books_json(&self, payload: &[u8]) -> CatalogResult<UploadResult> {
        let items = parse_batch(payload).map_err(|err| {
            warn!(
                "event=book_import module=service status=error error_code=invalid_input error={err}"
            );
            CatalogError::from(err)
        })?;

        let result = import_items(items, |request| self.create_book(request))?;
        info!(
            "event=book_import module=service status=ok success_count={} failed_count={}",
            result.success_count, result.failed_count
        );
        Ok(result)
    }

    fn filtered_books(&self, criteria: &BookCriteria) -> CatalogResult<Vec<BookResponse>> {
        Ok(self
            .books
            .find_all(criteria)?
            .into_iter()
            .map(BookResponse::from)
            .collect())
    }
}
