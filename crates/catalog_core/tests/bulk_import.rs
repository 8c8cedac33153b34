use catalog_core::db::open_db_in_memory;
use catalog_core::{
    sqlite_catalog, AuthorRequest, CatalogError, InvalidInput, UploadResult,
};

#[test]
fn mixed_batch_counts_success_and_failure() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_catalog(&conn).unwrap();
    let author = service.create_author(AuthorRequest::new("Main Author")).unwrap();

    let payload = format!(
        r#"[
            {{"title": "A", "authorId": {id}, "year": 2000}},
            {{"title": "B", "authorId": 9999, "year": 2001}}
        ]"#,
        id = author.id
    );
    let result = service.import_books_json(payload.as_bytes()).unwrap();

    assert_eq!(
        result,
        UploadResult {
            success_count: 1,
            failed_count: 1
        }
    );
    let books = service.list_all_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "A");
    assert_eq!(books[0].year_published, Some(2000));
}

#[test]
fn every_kind_of_item_failure_is_absorbed() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_catalog(&conn).unwrap();
    let author = service.create_author(AuthorRequest::new("A")).unwrap();

    let payload = format!(
        r#"[
            {{"title": "Good", "authorId": {id}, "yearPublished": 2000, "genres": ["X"]}},
            {{"title": "", "authorId": {id}}},
            {{"title": "No author"}},
            {{"title": "Bad year", "authorId": {id}, "year": 20}},
            {{"title": "Wrong type", "authorId": "one"}},
            {{"title": "Null genres", "authorId": {id}, "genres": null}}
        ]"#,
        id = author.id
    );
    let result = service.import_books_json(payload.as_bytes()).unwrap();

    assert_eq!(result.success_count, 2);
    assert_eq!(result.failed_count, 4);
    assert_eq!(result.total(), 6);

    let books = service.list_all_books().unwrap();
    let titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Good", "Null genres"]);
    assert_eq!(books[0].genres, vec!["X"]);
    assert!(books[1].genres.is_empty());
}

#[test]
fn item_with_both_year_spellings_counts_as_failed() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_catalog(&conn).unwrap();
    let author = service.create_author(AuthorRequest::new("A")).unwrap();

    let payload = format!(
        r#"[
            {{"title": "Both", "authorId": {id}, "year": 2000, "yearPublished": 2000}},
            {{"title": "One", "authorId": {id}, "year": 2000}}
        ]"#,
        id = author.id
    );
    let result = service.import_books_json(payload.as_bytes()).unwrap();

    assert_eq!(result.success_count, 1);
    assert_eq!(result.failed_count, 1);
    let books = service.list_all_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "One");
}

#[test]
fn duplicates_inside_a_batch_are_created_in_order() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_catalog(&conn).unwrap();
    let author = service.create_author(AuthorRequest::new("A")).unwrap();

    let payload = format!(
        r#"[{{"title": "Twin", "authorId": {id}}}, {{"title": "Twin", "authorId": {id}}}]"#,
        id = author.id
    );
    let result = service.import_books_json(payload.as_bytes()).unwrap();
    assert_eq!(result.success_count, 2);

    let books = service.list_all_books().unwrap();
    assert_eq!(books.len(), 2);
    assert!(books[0].id < books[1].id);
}

#[test]
fn malformed_batches_are_rejected_without_creating_records() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_catalog(&conn).unwrap();
    let author = service.create_author(AuthorRequest::new("A")).unwrap();

    let valid_item = format!(r#"{{"title": "Valid", "authorId": {}}}"#, author.id);
    let payloads = [
        "{ invalid json".to_string(),
        valid_item.clone(),
        format!("[{valid_item}, 42]"),
        format!("[{valid_item}, [\"nested\"]]"),
        "null".to_string(),
    ];

    for payload in payloads {
        let err = service.import_books_json(payload.as_bytes()).unwrap_err();
        assert!(
            matches!(
                err,
                CatalogError::InvalidInput(InvalidInput::MalformedBatch(_))
            ),
            "payload {payload} gave {err}"
        );
    }

    assert!(service.list_all_books().unwrap().is_empty());
}

#[test]
fn empty_batch_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_catalog(&conn).unwrap();

    let result = service.import_books_json(b"[]").unwrap();
    assert_eq!(result, UploadResult::default());
}
