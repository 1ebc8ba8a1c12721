//! Book rows from the `Info_Book` view and search parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bookstore_core::BookId;

/// One row of `Info_Book`: a book with its author, category and publisher.
///
/// Field names are the view's column names so the JSON matches what clients
/// of the view already expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BookInfo {
    pub book_id: BookId,
    pub title_book: String,
    pub isbn: String,
    pub name_author: String,
    pub name_category: String,
    pub description_category: Option<String>,
    pub name_publisher: String,
    /// Serialized as a decimal string, e.g. `"89000.00"`.
    pub price: Decimal,
    pub publication_year: i32,
}

/// Query string of `GET /api/books/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookSearch {
    /// Substring to look for; absent or empty matches every book.
    #[serde(default)]
    pub keyword: Option<String>,
}

impl BookSearch {
    /// `ILIKE` pattern matching the keyword anywhere in a column.
    ///
    /// `%`, `_` and `\` in the keyword are escaped so they match literally.
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let keyword = self.keyword.as_deref().unwrap_or_default();

        let mut pattern = String::with_capacity(keyword.len() + 2);
        pattern.push('%');
        for c in keyword.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}
