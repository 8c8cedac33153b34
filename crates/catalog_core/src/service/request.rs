//! Plain-value inputs accepted by the catalog service.

use crate::model::author::{AuthorId, NewAuthor};
use crate::model::book::BookDraft;
use crate::model::ValidationError;
use crate::query::criteria::BookCriteria;
use crate::query::page::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Create/update input for an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRequest {
    pub name: String,
}

impl AuthorRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub(crate) fn into_new_author(self) -> Result<NewAuthor, ValidationError> {
        let author = NewAuthor::new(self.name);
        author.validate()?;
        Ok(author)
    }
}

/// Create/update input for a book; also the shape of one bulk import item.
///
/// Missing fields decode to their empty value so that field violations are
/// reported as validation failures rather than decode errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_id: Option<AuthorId>,
    #[serde(default, alias = "year")]
    pub year_published: Option<i32>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
}

impl BookRequest {
    pub fn new(title: impl Into<String>, author_id: AuthorId) -> Self {
        Self {
            title: title.into(),
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year_published = Some(year);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = Some(genres.into_iter().map(Into::into).collect());
        self
    }

    /// Validates fields and normalizes absent genres to an empty list.
    pub(crate) fn into_draft(self) -> Result<BookDraft, ValidationError> {
        let author_id = self.author_id.ok_or(ValidationError::MissingAuthorId)?;
        let draft = BookDraft {
            title: self.title,
            author_id,
            year_published: self.year_published,
            genres: self.genres.unwrap_or_default(),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// List/search input for books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListQuery {
    #[serde(default)]
    pub author_id: Option<AuthorId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

impl BookListQuery {
    pub fn criteria(&self) -> BookCriteria {
        BookCriteria::new(self.author_id, self.title.clone(), self.year)
    }
}

impl Default for BookListQuery {
    fn default() -> Self {
        Self {
            author_id: None,
            title: None,
            year: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::{BookListQuery, BookRequest};
    use crate::model::ValidationError;

    #[test]
    fn missing_author_id_fails_validation() {
        let request = BookRequest {
            title: "Orphan".to_string(),
            ..BookRequest::default()
        };
        assert_eq!(request.into_draft(), Err(ValidationError::MissingAuthorId));
    }

    #[test]
    fn absent_genres_normalize_to_empty() {
        let draft = BookRequest::new("Dune", 1).into_draft().unwrap();
        assert!(draft.genres.is_empty());
    }

    #[test]
    fn year_alias_is_accepted() {
        let request: BookRequest =
            serde_json::from_str(r#"{"title":"A","authorId":1,"year":2000}"#).unwrap();
        assert_eq!(request.year_published, Some(2000));

        let request: BookRequest =
            serde_json::from_str(r#"{"title":"A","authorId":1,"yearPublished":1999,"genres":null}"#)
                .unwrap();
        assert_eq!(request.year_published, Some(1999));
        assert_eq!(request.genres, None);
    }

    #[test]
    fn year_and_year_published_together_are_a_duplicate_field() {
        let err = serde_json::from_str::<BookRequest>(
            r#"{"title":"A","authorId":1,"year":2000,"yearPublished":2000}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn list_query_defaults_to_first_page_of_twenty() {
        let query: BookListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, BookListQuery::default());
        assert_eq!(query.page, 1);
        assert_eq!(query.size, 20);
    }
}
