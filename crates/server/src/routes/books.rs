//! Book catalog handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use super::extract::ApiQuery;
use crate::db::books::BookRepository;
use crate::error::Result;
use crate::models::book::{BookInfo, BookSearch};
use crate::state::AppState;

/// `GET /api/books`
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<BookInfo>>> {
    let books = BookRepository::new(state.pool()).list().await?;
    Ok(Json(books))
}

/// `GET /api/books/author/{author}`
pub async fn by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> Result<Json<Vec<BookInfo>>> {
    let books = BookRepository::new(state.pool()).by_author(&author).await?;
    tracing::debug!(author = %author, count = books.len(), "Books by author");
    Ok(Json(books))
}

/// `GET /api/books/search?keyword=...`
pub async fn search(
    State(state): State<AppState>,
    ApiQuery(search): ApiQuery<BookSearch>,
) -> Result<Json<Vec<BookInfo>>> {
    let books = BookRepository::new(state.pool()).search(&search).await?;
    tracing::debug!(keyword = ?search.keyword, count = books.len(), "Book search");
    Ok(Json(books))
}
