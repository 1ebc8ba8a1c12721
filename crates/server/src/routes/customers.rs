//! Online customer and account handlers.

use axum::{Json, extract::State, http::StatusCode};

use super::extract::ApiJson;
use super::{MessageResponse, upsert_status};
use crate::db::customers::CustomerRepository;
use crate::error::Result;
use crate::models::account::{AccountRequest, AccountUpsert};
use crate::models::customer::{CustomerRequest, CustomerUpsert};
use crate::services::AccountService;
use crate::state::AppState;

/// `POST /api/customers`
///
/// 201 when the customer is new, 200 when an existing one was updated.
pub async fn upsert(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CustomerRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let customer = CustomerUpsert::try_from(request)?;
    let outcome = CustomerRepository::new(state.pool()).upsert(&customer).await?;

    let message = if outcome.is_created() {
        "New customer data created successfully"
    } else {
        "Customer data updated successfully"
    };
    Ok((upsert_status(&outcome), Json(MessageResponse { message })))
}

/// `POST /api/account`
///
/// 404 with `Customer not found` when `name` matches no customer.
pub async fn upsert_account(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AccountRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let account = AccountUpsert::try_from(request)?;
    let outcome = AccountService::new(state.pool()).upsert(&account).await?;

    let message = if outcome.is_created() {
        "New user account created successfully"
    } else {
        "User account updated successfully"
    };
    Ok((upsert_status(&outcome), Json(MessageResponse { message })))
}
