//! Wishlist and wishlist item queries.

use sqlx::{PgConnection, PgPool};

use bookstore_core::{BookId, CustomerId, Quantity, WishlistId, WishlistItemId};

use super::RepositoryError;
use crate::models::wishlist::{WishlistCustomer, WishlistItem};

/// Repository for read-only wishlist queries.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every wishlist entry with its customer and book.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_customers(&self) -> Result<Vec<WishlistCustomer>, RepositoryError> {
        let rows = sqlx::query_as::<_, WishlistCustomer>(
            r"
            SELECT wishlist_id, name_customer_online, title_book, name_author, price, quantity_order
            FROM Wihslist_Customer
            ORDER BY wishlist_id, title_book
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

/// The customer's wishlist. Customers have at most one; the lowest id wins.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_id_for_customer(
    conn: &mut PgConnection,
    customer_id: CustomerId,
) -> Result<Option<WishlistId>, RepositoryError> {
    let id = sqlx::query_scalar::<_, WishlistId>(
        "SELECT wishlist_id FROM Wishlist WHERE customer_on_id = $1 ORDER BY wishlist_id LIMIT 1",
    )
    .bind(customer_id)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}

/// The item for `book_id` on `wishlist_id`, whatever its quantity.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_item_id(
    conn: &mut PgConnection,
    wishlist_id: WishlistId,
    book_id: BookId,
) -> Result<Option<WishlistItemId>, RepositoryError> {
    let id = sqlx::query_scalar::<_, WishlistItemId>(
        r"
        SELECT wishlist_item_id FROM Wishlist_Item
        WHERE wishlist_id = $1 AND book_id = $2
        ORDER BY wishlist_item_id
        LIMIT 1
        ",
    )
    .bind(wishlist_id)
    .bind(book_id)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}

/// Set the quantity of an existing item.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the item vanished,
/// `RepositoryError::Database` if the statement fails.
pub async fn update_item_quantity(
    conn: &mut PgConnection,
    item_id: WishlistItemId,
    quantity: Quantity,
) -> Result<WishlistItem, RepositoryError> {
    sqlx::query_as::<_, WishlistItem>(
        r"
        UPDATE Wishlist_Item SET quantity_order = $1
        WHERE wishlist_item_id = $2
        RETURNING wishlist_item_id, wishlist_id, book_id, quantity_order
        ",
    )
    .bind(quantity.get())
    .bind(item_id)
    .fetch_optional(conn)
    .await?
    .ok_or(RepositoryError::NotFound("wishlist item"))
}

/// Add `book_id` to `wishlist_id`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn insert_item(
    conn: &mut PgConnection,
    wishlist_id: WishlistId,
    book_id: BookId,
    quantity: Quantity,
) -> Result<WishlistItem, RepositoryError> {
    let item = sqlx::query_as::<_, WishlistItem>(
        r"
        INSERT INTO Wishlist_Item (wishlist_id, book_id, quantity_order)
        VALUES ($1, $2, $3)
        RETURNING wishlist_item_id, wishlist_id, book_id, quantity_order
        ",
    )
    .bind(wishlist_id)
    .bind(book_id)
    .bind(quantity.get())
    .fetch_one(conn)
    .await?;
    Ok(item)
}

/// Delete the items for `book_id` on `wishlist_id` whose quantity is exactly
/// `quantity`, returning the first one removed.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn delete_item(
    conn: &mut PgConnection,
    wishlist_id: WishlistId,
    book_id: BookId,
    quantity: Quantity,
) -> Result<Option<WishlistItem>, RepositoryError> {
    let deleted = sqlx::query_as::<_, WishlistItem>(
        r"
        DELETE FROM Wishlist_Item
        WHERE wishlist_id = $1 AND book_id = $2 AND quantity_order = $3
        RETURNING wishlist_item_id, wishlist_id, book_id, quantity_order
        ",
    )
    .bind(wishlist_id)
    .bind(book_id)
    .bind(quantity.get())
    .fetch_all(conn)
    .await?;

    Ok(deleted.into_iter().min_by_key(|item| item.wishlist_item_id))
}
