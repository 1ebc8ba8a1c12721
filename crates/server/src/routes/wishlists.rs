//! Wishlist handlers.

use axum::{Json, extract::State, http::StatusCode};

use super::extract::ApiJson;
use super::{ItemResponse, upsert_status};
use crate::db::wishlists::WishlistRepository;
use crate::error::Result;
use crate::models::wishlist::{WishlistCustomer, WishlistItemCommand, WishlistItemRequest};
use crate::services::WishlistService;
use crate::state::AppState;

/// `POST /api/wishlist-item`
pub async fn upsert_item(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<WishlistItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>)> {
    let command = WishlistItemCommand::try_from(request)?;
    let outcome = WishlistService::new(state.pool()).upsert_item(&command).await?;

    let status = upsert_status(&outcome);
    let message = if outcome.is_created() {
        "Item successfully added to wishlist"
    } else {
        "Wishlist item updated successfully"
    };
    Ok((
        status,
        Json(ItemResponse {
            message,
            item: outcome.into_inner(),
        }),
    ))
}

/// `DELETE /api/wishlist-item`
///
/// Only removes the item whose quantity equals the requested one.
pub async fn remove_item(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<WishlistItemRequest>,
) -> Result<Json<ItemResponse>> {
    let command = WishlistItemCommand::try_from(request)?;
    let item = WishlistService::new(state.pool()).remove_item(&command).await?;

    Ok(Json(ItemResponse {
        message: "Wishlist item deleted successfully",
        item,
    }))
}

/// `GET /api/wishlistCustomers`
pub async fn customers(State(state): State<AppState>) -> Result<Json<Vec<WishlistCustomer>>> {
    let rows = WishlistRepository::new(state.pool()).list_customers().await?;
    Ok(Json(rows))
}
