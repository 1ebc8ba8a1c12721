//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Every error becomes a JSON body
//! of the form `{"message": "..."}`; server-side failures are logged and sent
//! to Sentry first, and their details are replaced by a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationError;
use crate::services::{AccountError, WishlistError};

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
const CONFLICT_MESSAGE: &str = "Concurrent update, please retry";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Account operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Wishlist operation failed.
    #[error("Wishlist error: {0}")]
    Wishlist(#[from] WishlistError),

    /// Request body failed validation.
    #[error("Bad request: {0}")]
    Validation(#[from] ValidationError),

    /// Request body is not the expected JSON.
    #[error("Invalid JSON body: {0}")]
    Json(#[from] JsonRejection),

    /// Query string could not be parsed.
    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => repository_status(err),
            Self::Account(err) => match err {
                AccountError::CustomerNotFound => StatusCode::NOT_FOUND,
                AccountError::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
                AccountError::Repository(err) => repository_status(err),
            },
            Self::Wishlist(err) => match err {
                WishlistError::CustomerNotFound
                | WishlistError::WishlistNotFound
                | WishlistError::BookNotFound
                | WishlistError::ItemNotFound => StatusCode::NOT_FOUND,
                WishlistError::Repository(err) => repository_status(err),
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Json(rejection) => rejection.status(),
            Self::Query(rejection) => rejection.status(),
        }
    }

    /// Message safe to show to the client.
    #[must_use]
    pub fn client_message(&self) -> String {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            return INTERNAL_ERROR_MESSAGE.to_string();
        }
        if status == StatusCode::CONFLICT {
            return CONFLICT_MESSAGE.to_string();
        }

        match self {
            Self::Account(err) => err.to_string(),
            Self::Wishlist(err) => err.to_string(),
            Self::Validation(err) => err.to_string(),
            Self::Json(rejection) => rejection.body_text(),
            Self::Query(rejection) => rejection.body_text(),
            Self::Database(err) => err.to_string(),
        }
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RepositoryError::SerializationFailure(_) => StatusCode::CONFLICT,
        RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "message": self.client_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_errors_use_404_and_their_message() {
        let cases = [
            (AppError::from(WishlistError::CustomerNotFound), "Customer not found"),
            (
                AppError::from(WishlistError::WishlistNotFound),
                "Wishlist not found for this customer",
            ),
            (AppError::from(WishlistError::BookNotFound), "Book not found"),
            (AppError::from(WishlistError::ItemNotFound), "Wishlist item not found"),
            (AppError::from(AccountError::CustomerNotFound), "Customer not found"),
        ];

        for (err, message) in cases {
            let (status, body) = render(err).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], message);
        }
    }

    #[tokio::test]
    async fn test_database_errors_hide_details() {
        let err = AppError::from(WishlistError::Repository(RepositoryError::Database(
            sqlx::Error::Protocol("relation \"wishlist\" does not exist".to_string()),
        )));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_serialization_failure_is_conflict() {
        let err = AppError::from(RepositoryError::SerializationFailure(sqlx::Error::PoolTimedOut));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Concurrent update, please retry");
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let err = AppError::from(ValidationError("quantity must be at least 1 (got 0)".to_string()));
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "quantity must be at least 1 (got 0)");
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(ValidationError("name is required".to_string()));
        assert_eq!(err.to_string(), "Bad request: name is required");
        assert_eq!(err.client_message(), "name is required");
    }
}
