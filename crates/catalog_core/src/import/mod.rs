//! Bulk book import from a JSON batch.
//!
//! # Responsibility
//! - Decode the batch framing once and reject it wholesale when malformed.
//! - Feed every item to the single-item create operation in batch order.
//! - Tally successes and failures without aborting on an item failure.
//!
//! # Invariants
//! - A malformed batch creates nothing.
//! - `success_count + failed_count` equals the batch length.
//! - Store faults are not absorbed; they abort the import.

use crate::error::{CatalogResult, InvalidInput};
use crate::mapper::BookResponse;
use crate::service::request::BookRequest;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome tally of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub success_count: u64,
    pub failed_count: u64,
}

impl UploadResult {
    fn succeeded(self) -> Self {
        Self {
            success_count: self.success_count + 1,
            ..self
        }
    }

    fn failed(self) -> Self {
        Self {
            failed_count: self.failed_count + 1,
            ..self
        }
    }

    pub fn total(&self) -> u64 {
        self.success_count + self.failed_count
    }
}

/// Decodes the batch framing: a JSON array whose elements are all objects.
pub fn parse_batch(payload: &[u8]) -> Result<Vec<Map<String, Value>>, InvalidInput> {
    let root: Value = serde_json::from_slice(payload)
        .map_err(|err| InvalidInput::MalformedBatch(format!("invalid JSON: {err}")))?;

    let Value::Array(elements) = root else {
        return Err(InvalidInput::MalformedBatch(
            "expected a JSON array of book objects".to_string(),
        ));
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| match element {
            Value::Object(item) => Ok(item),
            _ => Err(InvalidInput::MalformedBatch(format!(
                "batch element {index} is not an object"
            ))),
        })
        .collect()
}

/// Applies `create` to every item in order and folds the outcomes.
///
/// An item counts as failed when its fields cannot be decoded into a
/// [`BookRequest`] or when `create` returns a recoverable error.
pub fn import_items<F>(items: Vec<Map<String, Value>>, mut create: F) -> CatalogResult<UploadResult>
where
    F: FnMut(BookRequest) -> CatalogResult<BookResponse>,
{
    items
        .into_iter()
        .enumerate()
        .try_fold(UploadResult::default(), |tally, (index, item)| {
            let request = match serde_json::from_value::<BookRequest>(Value::Object(item)) {
                Ok(request) => request,
                Err(err) => {
                    warn!(
                        "event=book_import_item module=import status=error index={index} error_code=invalid_item error={err}"
                    );
                    return Ok(tally.failed());
                }
            };

            let title = request.title.clone();
            match create(request) {
                Ok(created) => {
                    debug!(
                        "event=book_import_item module=import status=ok index={index} book_id={}",
                        created.id
                    );
                    Ok(tally.succeeded())
                }
                Err(err) if err.is_recoverable() => {
                    warn!(
                        "event=book_import_item module=import status=error index={index} title={:?} error_code={} error={err}",
                        title,
                        err.code()
                    );
                    Ok(tally.failed())
                }
                Err(err) => Err(err),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::{import_items, parse_batch, UploadResult};
    use crate::error::{CatalogError, InvalidInput};
    use crate::mapper::{AuthorResponse, BookResponse};
    use crate::repo::RepoError;
    use crate::service::request::BookRequest;

    fn created(request: &BookRequest) -> BookResponse {
        BookResponse {
            id: 1,
            title: request.title.clone(),
            author: AuthorResponse {
                id: request.author_id.unwrap_or_default(),
                name: "a".to_string(),
            },
            year_published: request.year_published,
            genres: request.genres.clone().unwrap_or_default(),
        }
    }

    #[test]
    fn non_array_payloads_are_malformed() {
        let payloads: [&[u8]; 4] = [b"{ invalid json", br#"{"title":"A"}"#, b"[1, {}]", b""];
        for payload in payloads {
            assert!(matches!(
                parse_batch(payload),
                Err(InvalidInput::MalformedBatch(_))
            ));
        }
    }

    #[test]
    fn empty_array_is_a_valid_empty_batch() {
        let items = parse_batch(b"[]").unwrap();
        let result = import_items(items, |request| Ok(created(&request))).unwrap();
        assert_eq!(result, UploadResult::default());
    }

    #[test]
    fn item_failures_are_tallied_in_order() {
        let items = parse_batch(
            br#"[
                {"title": "A", "authorId": 1, "year": 2000},
                {"title": "B", "authorId": 9999, "year": 2001},
                {"title": 42},
                {"title": "C", "authorId": 1}
            ]"#,
        )
        .unwrap();

        let mut seen = Vec::new();
        let result = import_items(items, |request| {
            seen.push(request.title.clone());
            match request.author_id {
                Some(1) => Ok(created(&request)),
                Some(other) => Err(CatalogError::author_not_found(other)),
                None => Err(CatalogError::author_not_found(0)),
            }
        })
        .unwrap();

        assert_eq!(result.success_count, 2);
        assert_eq!(result.failed_count, 2);
        assert_eq!(result.total(), 4);
        assert_eq!(seen, vec!["A", "B", "C"]);
    }

    #[test]
    fn store_failure_aborts_the_import() {
        let items = parse_batch(br#"[{"title": "A", "authorId": 1}, {"title": "B", "authorId": 1}]"#)
            .unwrap();

        let mut calls = 0;
        let result = import_items(items, |_| {
            calls += 1;
            Err(CatalogError::Store(RepoError::InvalidData("disk gone".to_string())))
        });

        assert!(matches!(result, Err(CatalogError::Store(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn upload_result_serializes_with_camel_case_keys() {
        let result = UploadResult {
            success_count: 1,
            failed_count: 1,
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"successCount":1,"failedCount":1}"#
        );
    }
}
