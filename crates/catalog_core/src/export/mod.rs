//! Flat-file exports of book listings.
//!
//! # Invariants
//! - The header row is always written, even for an empty listing.
//! - Row order is the caller's order; the service passes listing order.

pub mod book_csv;

use thiserror::Error;

pub use book_csv::{write_books_csv, CsvExport, CSV_HEADER, GENRE_SEPARATOR};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV into inner error: {0}")]
    CsvIntoInner(String),
}
