//! Integration tests for the book catalog endpoints.
//!
//! These tests require a running `PostgreSQL` database at `TEST_DATABASE_URL`.
//!
//! Run with: cargo test -p bookstore-integration-tests -- --ignored

use bookstore_integration_tests::{TestBook, TestContext, unique};
use reqwest::StatusCode;
use serde_json::Value;

async fn get_books(ctx: &TestContext, path: &str) -> Vec<Value> {
    let resp = ctx
        .client
        .get(ctx.url(path))
        .send()
        .await
        .expect("Failed to get books");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Response is not a JSON array")
}

/// Text of every searchable column of a book row, lowercased.
fn searchable_text(book: &Value) -> Vec<String> {
    [
        "title_book",
        "isbn",
        "name_author",
        "name_category",
        "description_category",
        "name_publisher",
        "price",
        "publication_year",
    ]
    .iter()
    .filter_map(|field| match &book[*field] {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
    .collect()
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_list_includes_inserted_book() {
    let ctx = TestContext::new().await;
    let title = unique("Ronggeng Dukuh Paruk");
    let book_id = ctx
        .insert_book(&TestBook::new(&title, &unique("Ahmad Tohari")))
        .await;

    let books = get_books(&ctx, "/api/books").await;
    let book = books
        .iter()
        .find(|b| b["book_id"] == book_id.as_i32())
        .expect("Inserted book missing from listing");

    assert_eq!(book["title_book"], title.as_str());
    assert_eq!(book["price"], "75000.00");
    assert_eq!(book["publication_year"], 2019);
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_by_author_matches_exactly() {
    let ctx = TestContext::new().await;
    let author = unique("Andrea Hirata");
    let similar = format!("{author} Jr");

    ctx.insert_book(&TestBook::new("Laskar Pelangi", &author)).await;
    ctx.insert_book(&TestBook::new("Edensor", &similar)).await;

    let books = get_books(&ctx, &format!("/api/books/author/{author}")).await;

    assert_eq!(books.len(), 1);
    assert!(books.iter().all(|b| b["name_author"] == author.as_str()));
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_by_unknown_author_is_empty() {
    let ctx = TestContext::new().await;
    let books = get_books(&ctx, &format!("/api/books/author/{}", unique("Nobody"))).await;
    assert!(books.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_search_by_year_matches_any_column() {
    let ctx = TestContext::new().await;
    let author = unique("Leila Chudori");
    let mut book = TestBook::new("Pulang", &author);
    book.year = 2020;
    let book_id = ctx.insert_book(&book).await;

    let books = get_books(&ctx, "/api/books/search?keyword=2020").await;

    assert!(books.iter().any(|b| b["book_id"] == book_id.as_i32()));
    for row in &books {
        assert!(
            searchable_text(row).iter().any(|text| text.contains("2020")),
            "row does not mention 2020: {row}"
        );
    }
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_search_is_case_insensitive() {
    let ctx = TestContext::new().await;
    let title = unique("Cantik Itu Luka");
    let book_id = ctx
        .insert_book(&TestBook::new(&title, &unique("Eka Kurniawan")))
        .await;

    let keyword = title.to_uppercase().replace(' ', "%20");
    let books = get_books(&ctx, &format!("/api/books/search?keyword={keyword}")).await;

    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["book_id"], book_id.as_i32());
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_search_wildcards_match_literally() {
    let ctx = TestContext::new().await;
    ctx.insert_book(&TestBook::new(&unique("Gadis Pantai"), &unique("Pramoedya")))
        .await;

    // `_` alone would match every row if it were not escaped
    let books = get_books(&ctx, "/api/books/search?keyword=_").await;
    for row in &books {
        assert!(searchable_text(row).iter().any(|text| text.contains('_')));
    }
}

#[tokio::test]
#[ignore = "Requires a running PostgreSQL database"]
async fn test_search_without_keyword_lists_everything() {
    let ctx = TestContext::new().await;
    ctx.insert_book(&TestBook::new(&unique("Saman"), &unique("Ayu Utami")))
        .await;

    let all = get_books(&ctx, "/api/books").await;
    let searched = get_books(&ctx, "/api/books/search").await;

    assert!(searched.len() >= all.len());
}
