//! Wishlist rows and the wishlist item request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bookstore_core::{BookId, Quantity, WishlistId, WishlistItemId};

use super::{ValidationError, require_text};

/// A `Wishlist_Item` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct WishlistItem {
    pub wishlist_item_id: WishlistItemId,
    pub wishlist_id: WishlistId,
    pub book_id: BookId,
    pub quantity_order: i32,
}

/// One row of the `Wihslist_Customer` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct WishlistCustomer {
    pub wishlist_id: WishlistId,
    pub name_customer_online: String,
    pub title_book: String,
    pub name_author: String,
    pub price: Decimal,
    pub quantity_order: i32,
}

/// Body of `POST /api/wishlist-item` and `DELETE /api/wishlist-item`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemRequest {
    pub customer_name: String,
    /// Title of the book.
    pub book_name: String,
    pub quantity: i64,
}

/// A validated wishlist item command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistItemCommand {
    pub customer_name: String,
    pub book_title: String,
    pub quantity: Quantity,
}

impl TryFrom<WishlistItemRequest> for WishlistItemCommand {
    type Error = ValidationError;

    fn try_from(request: WishlistItemRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            customer_name: require_text("customerName", &request.customer_name)?,
            book_title: require_text("bookName", &request.book_name)?,
            quantity: Quantity::new(request.quantity).map_err(|e| ValidationError(e.to_string()))?,
        })
    }
}
