use super::ExportError;
use crate::mapper::BookResponse;
use csv::Writer;
use std::io::Write;

/// Fixed header of the book report.
pub const CSV_HEADER: [&str; 5] = ["ID", "Title", "Author", "Year Published", "Genres"];
/// Joins a book's genres into the single `Genres` column.
pub const GENRE_SEPARATOR: &str = "|";

/// Buffered CSV rendering of a book listing.
pub trait CsvExport {
    fn to_csv_bytes(&self) -> Result<Vec<u8>, ExportError>;
}

impl CsvExport for [BookResponse] {
    fn to_csv_bytes(&self) -> Result<Vec<u8>, ExportError> {
        write_books_csv(self, Vec::new())
    }
}

/// Streams the header and one row per book into `out`, returning the writer.
///
/// Fields are quoted only when they contain a delimiter, quote or newline.
pub fn write_books_csv<'a, W: Write>(
    books: impl IntoIterator<Item = &'a BookResponse>,
    out: W,
) -> Result<W, ExportError> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)?;

    for book in books {
        let year = book
            .year_published
            .map(|year| year.to_string())
            .unwrap_or_default();
        wtr.write_record([
            book.id.to_string().as_str(),
            book.title.as_str(),
            book.author.name.as_str(),
            year.as_str(),
            book.genres.join(GENRE_SEPARATOR).as_str(),
        ])?;
    }

    wtr.flush()?;
    wtr.into_inner()
        .map_err(|err| ExportError::CsvIntoInner(err.error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::CsvExport;
    use crate::mapper::{AuthorResponse, BookResponse};

    fn book(id: i64, title: &str, year: Option<i32>, genres: &[&str]) -> BookResponse {
        BookResponse {
            id,
            title: title.to_string(),
            author: AuthorResponse {
                id: 1,
                name: "Main Author".to_string(),
            },
            year_published: year,
            genres: genres.iter().map(|genre| genre.to_string()).collect(),
        }
    }

    #[test]
    fn empty_listing_still_has_header() {
        let books: Vec<BookResponse> = Vec::new();
        let csv = String::from_utf8(books.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv, "ID,Title,Author,Year Published,Genres\n");
    }

    #[test]
    fn rows_join_genres_and_leave_missing_year_empty() {
        let books = vec![
            book(1, "CSVBook", Some(2000), &["A", "B"]),
            book(2, "No Year", None, &[]),
        ];
        let csv = String::from_utf8(books.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(
            csv,
            "ID,Title,Author,Year Published,Genres\n\
             1,CSVBook,Main Author,2000,A|B\n\
             2,No Year,Main Author,,\n"
        );
    }

    #[test]
    fn fields_with_commas_and_quotes_are_escaped() {
        let books = vec![book(3, "Hello, \"World\"", Some(1999), &["x,y"])];
        let csv = String::from_utf8(books.to_csv_bytes().unwrap()).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "3,\"Hello, \"\"World\"\"\",Main Author,1999,\"x,y\"");
    }
}
