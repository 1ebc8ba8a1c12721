//! Book queries against the `Info_Book` view and the `Book` table.

use sqlx::{PgConnection, PgPool};

use bookstore_core::BookId;

use super::RepositoryError;
use crate::models::book::{BookInfo, BookSearch};

const INFO_BOOK_COLUMNS: &str = "book_id, title_book, isbn, name_author, name_category, \
     description_category, name_publisher, price, publication_year";

/// Repository for read-only book queries.
pub struct BookRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BookRepository<'a> {
    /// Create a new book repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every book in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<BookInfo>, RepositoryError> {
        let sql = format!("SELECT {INFO_BOOK_COLUMNS} FROM Info_Book ORDER BY book_id");
        let books = sqlx::query_as::<_, BookInfo>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(books)
    }

    /// Books whose author name equals `author` exactly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn by_author(&self, author: &str) -> Result<Vec<BookInfo>, RepositoryError> {
        let sql = format!(
            "SELECT {INFO_BOOK_COLUMNS} FROM Info_Book WHERE name_author = $1 ORDER BY book_id"
        );
        let books = sqlx::query_as::<_, BookInfo>(&sql)
            .bind(author)
            .fetch_all(self.pool)
            .await?;
        Ok(books)
    }

    /// Books where any descriptive column contains the keyword, ignoring case.
    ///
    /// Numeric columns are cast to text, so `"2020"` matches the publication
    /// year and `"89"` matches a price of `89000.00`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, search: &BookSearch) -> Result<Vec<BookInfo>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {INFO_BOOK_COLUMNS}
            FROM Info_Book
            WHERE
                title_book ILIKE $1 OR
                name_category ILIKE $1 OR
                description_category ILIKE $1 OR
                isbn::text ILIKE $1 OR
                name_author ILIKE $1 OR
                name_publisher ILIKE $1 OR
                price::text ILIKE $1 OR
                publication_year::text ILIKE $1
            ORDER BY book_id
            "
        );
        let books = sqlx::query_as::<_, BookInfo>(&sql)
            .bind(search.like_pattern())
            .fetch_all(self.pool)
            .await?;
        Ok(books)
    }
}

/// ID of the first book titled exactly `title`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_id_by_title(
    conn: &mut PgConnection,
    title: &str,
) -> Result<Option<BookId>, RepositoryError> {
    let id = sqlx::query_scalar::<_, BookId>(
        "SELECT book_id FROM Book WHERE title = $1 ORDER BY book_id LIMIT 1",
    )
    .bind(title)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}
