//! Adding and removing wishlist items.
//!
//! Both operations run the same lookup pipeline inside one transaction:
//!
//! ```text
//! customer name ──► customer id ──► wishlist id ──► book id ──► item
//!      │                 │               │              │
//!      └── miss ─────────┴── miss ───────┴── miss ──────┴──► ROLLBACK
//! ```
//!
//! Each stage yields `Some(id)` or `None`; a `None` becomes the matching
//! [`WishlistError`] and short-circuits to a rollback. Reaching the item
//! stage ends in a single `COMMIT` (or `ROLLBACK` if the delete finds no
//! exact match).

use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use bookstore_core::{BookId, WishlistId};

use crate::db::{self, RepositoryError, Retryable, books, customers, wishlists};
use crate::models::Upserted;
use crate::models::wishlist::{WishlistItem, WishlistItemCommand};

/// Errors from wishlist item operations.
///
/// The display strings are returned to clients verbatim.
#[derive(Debug, Error)]
pub enum WishlistError {
    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Wishlist not found for this customer")]
    WishlistNotFound,

    #[error("Book not found")]
    BookNotFound,

    /// No item with the requested book and exact quantity.
    #[error("Wishlist item not found")]
    ItemNotFound,

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl Retryable for WishlistError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_retryable())
    }
}

/// Wishlist and book a command resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResolvedTarget {
    wishlist_id: WishlistId,
    book_id: BookId,
}

/// Wishlist item workflows.
pub struct WishlistService<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Put `command.quantity` copies of the book on the customer's wishlist.
    ///
    /// Updates the quantity of the existing item for that book, or adds one.
    ///
    /// # Errors
    ///
    /// Returns the `*NotFound` variant for the first missing customer,
    /// wishlist or book. Nothing is written in that case.
    pub async fn upsert_item(
        &self,
        command: &WishlistItemCommand,
    ) -> Result<Upserted<WishlistItem>, WishlistError> {
        db::retry_on_conflict("upsert_wishlist_item", move || async move {
            let mut tx = db::begin_serializable(self.pool).await?;
            let outcome = upsert_item_in(&mut tx, command).await;
            db::finish(tx, outcome).await
        })
        .await
    }

    /// Remove the item for the book whose quantity equals `command.quantity`.
    ///
    /// # Errors
    ///
    /// Returns `WishlistError::ItemNotFound` if no item matches the exact
    /// quantity, or the `*NotFound` variant for the first missing
    /// dependency. Nothing is deleted in either case.
    pub async fn remove_item(
        &self,
        command: &WishlistItemCommand,
    ) -> Result<WishlistItem, WishlistError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;
        let outcome = remove_item_in(&mut tx, command).await;
        db::finish(tx, outcome).await
    }
}

async fn upsert_item_in(
    conn: &mut PgConnection,
    command: &WishlistItemCommand,
) -> Result<Upserted<WishlistItem>, WishlistError> {
    let target = resolve_target(conn, command).await?;

    match wishlists::find_item_id(conn, target.wishlist_id, target.book_id).await? {
        Some(item_id) => {
            let item = wishlists::update_item_quantity(conn, item_id, command.quantity).await?;
            tracing::info!(
                wishlist_item_id = %item.wishlist_item_id,
                quantity = item.quantity_order,
                "Wishlist item updated"
            );
            Ok(Upserted::Updated(item))
        }
        None => {
            let item = wishlists::insert_item(
                conn,
                target.wishlist_id,
                target.book_id,
                command.quantity,
            )
            .await?;
            tracing::info!(
                wishlist_item_id = %item.wishlist_item_id,
                quantity = item.quantity_order,
                "Wishlist item added"
            );
            Ok(Upserted::Created(item))
        }
    }
}

async fn remove_item_in(
    conn: &mut PgConnection,
    command: &WishlistItemCommand,
) -> Result<WishlistItem, WishlistError> {
    let target = resolve_target(conn, command).await?;

    let item = wishlists::delete_item(conn, target.wishlist_id, target.book_id, command.quantity)
        .await?
        .ok_or(WishlistError::ItemNotFound)?;

    tracing::info!(wishlist_item_id = %item.wishlist_item_id, "Wishlist item deleted");
    Ok(item)
}

/// Customer → wishlist → book, stopping at the first miss.
async fn resolve_target(
    conn: &mut PgConnection,
    command: &WishlistItemCommand,
) -> Result<ResolvedTarget, WishlistError> {
    let customer_id = customers::find_id_by_name(conn, &command.customer_name)
        .await?
        .ok_or(WishlistError::CustomerNotFound)?;

    let wishlist_id = wishlists::find_id_for_customer(conn, customer_id)
        .await?
        .ok_or(WishlistError::WishlistNotFound)?;

    let book_id = books::find_id_by_title(conn, &command.book_title)
        .await?
        .ok_or(WishlistError::BookNotFound)?;

    tracing::debug!(
        customer_id = %customer_id,
        wishlist_id = %wishlist_id,
        book_id = %book_id,
        "Wishlist target resolved"
    );

    Ok(ResolvedTarget {
        wishlist_id,
        book_id,
    })
}
