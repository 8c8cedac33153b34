//! Book filter criteria.
//!
//! Each present filter contributes one condition; conditions are joined with
//! `AND`. A `None` filter (or a blank title) contributes nothing.

use crate::db::FOLD_CASE_FUNCTION;
use crate::model::author::AuthorId;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

const LIKE_ESCAPE: char = '\\';

/// Optional filters applied to book listings and exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCriteria {
    /// Exact author id.
    pub author_id: Option<AuthorId>,
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Exact publication year.
    pub year: Option<i32>,
}

/// SQL condition plus positional parameters, in bind order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlPredicate {
    pub clause: String,
    pub params: Vec<Value>,
}

impl BookCriteria {
    pub fn new(author_id: Option<AuthorId>, title: Option<String>, year: Option<i32>) -> Self {
        Self {
            author_id,
            title,
            year,
        }
    }

    /// Title filter with blank input treated as absent.
    pub fn title_filter(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    /// SQL form of the predicate against a `books` table aliased as `b`.
    ///
    /// The clause is `1 = 1` when no filter is present.
    pub fn to_sql(&self) -> SqlPredicate {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(author_id) = self.author_id {
            conditions.push("b.author_id = ?".to_string());
            params.push(Value::Integer(author_id));
        }

        if let Some(needle) = self.title_filter() {
            conditions.push(format!(
                "{FOLD_CASE_FUNCTION}(b.title) LIKE ? ESCAPE '{LIKE_ESCAPE}'"
            ));
            params.push(Value::Text(format!(
                "%{}%",
                escape_like(&needle.to_lowercase())
            )));
        }

        if let Some(year) = self.year {
            conditions.push("b.year_published = ?".to_string());
            params.push(Value::Integer(i64::from(year)));
        }

        let clause = if conditions.is_empty() {
            "1 = 1".to_string()
        } else {
            conditions.join(" AND ")
        };

        SqlPredicate { clause, params }
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == LIKE_ESCAPE || ch == '%' || ch == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}
