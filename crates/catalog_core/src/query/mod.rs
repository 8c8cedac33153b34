//! Listing primitives: filter criteria and page arithmetic.
//!
//! # Responsibility
//! - Compose optional book filters into one AND-ed predicate.
//! - Translate 1-based page requests into offset/limit and back into
//!   `(items, total_pages)` envelopes.
//!
//! # Invariants
//! - An absent filter never narrows the result set.
//! - Listing order is `title ASC, id ASC` everywhere.

pub mod criteria;
pub mod page;

/// Fixed ordering applied to every book listing and export. Titles compare
/// with SQLite's `BINARY` collation, so uppercase sorts before lowercase.
pub const BOOK_ORDER_BY: &str = "b.title ASC, b.id ASC";
/// Fixed ordering applied to author listings.
pub const AUTHOR_ORDER_BY: &str = "name ASC, id ASC";
