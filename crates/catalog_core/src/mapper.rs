//! Response projections for persisted records.
//!
//! Mapping is pure and total: every `Book` already carries its author, so the
//! embedded summary is always populated.

use crate::model::author::{Author, AuthorId};
use crate::model::book::{Book, BookId};
use serde::{Deserialize, Serialize};

/// Externally visible author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: AuthorId,
    pub name: String,
}

/// Externally visible book with its author flattened into a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub author: AuthorResponse,
    pub year_published: Option<i32>,
    pub genres: Vec<String>,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            name: author.name,
        }
    }
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: AuthorResponse::from(book.author),
            year_published: book.year_published,
            genres: book.genres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BookResponse;
    use crate::model::author::Author;
    use crate::model::book::Book;

    #[test]
    fn book_projection_embeds_author_summary() {
        let book = Book {
            id: 9,
            title: "Dune".to_string(),
            author: Author {
                id: 2,
                name: "Frank Herbert".to_string(),
            },
            year_published: Some(1965),
            genres: vec!["SciFi".to_string(), "SciFi".to_string()],
        };

        let response = BookResponse::from(book);
        assert_eq!(response.author.id, 2);
        assert_eq!(response.author.name, "Frank Herbert");
        assert_eq!(response.genres, vec!["SciFi", "SciFi"]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["yearPublished"], 1965);
        assert_eq!(json["author"]["name"], "Frank Herbert");
    }
}
