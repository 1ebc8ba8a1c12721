//! HTTP routes for the bookstore API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Liveness check
//! GET    /health/ready               - Readiness check (database)
//!
//! # Books
//! GET    /api/books                  - Every book with author, category, publisher
//! GET    /api/books/author/{author}  - Books by exact author name
//! GET    /api/books/search?keyword=  - Case-insensitive search over all columns
//!
//! # Customers
//! POST   /api/customers              - Create or update a customer by name
//! POST   /api/account                - Create or update a user account by username
//!
//! # Wishlists
//! POST   /api/wishlist-item          - Add a book or change its quantity
//! DELETE /api/wishlist-item          - Remove an item with the given quantity
//! GET    /api/wishlistCustomers      - Every wishlist line with its customer
//! ```

pub mod books;
pub mod customers;
pub mod extract;
pub mod health;
pub mod wishlists;

use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response, StatusCode},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::models::Upserted;
use crate::models::wishlist::WishlistItem;
use crate::state::AppState;

/// Body of customer and account upsert responses.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body of wishlist item responses.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub message: &'static str,
    pub item: WishlistItem,
}

/// `201 Created` for inserts, `200 OK` for updates.
pub(crate) const fn upsert_status<T>(outcome: &Upserted<T>) -> StatusCode {
    if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    }
}

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(books::index))
        .route("/books/author/{author}", get(books::by_author))
        .route("/books/search", get(books::search))
        .route("/customers", post(customers::upsert))
        .route("/account", post(customers::upsert_account))
        .route(
            "/wishlist-item",
            post(wishlists::upsert_item).delete(wishlists::remove_item),
        )
        .route("/wishlistCustomers", get(wishlists::customers))
}

/// Build the full application with health checks, middleware and state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::BookstoreConfig;
    use crate::middleware::REQUEST_ID_HEADER;

    /// App whose pool points at a closed port, so any handler that reaches
    /// the database fails.
    fn test_app() -> Router {
        let config = BookstoreConfig::from_vars(|key| match key {
            "DATABASE_URL" => Some("postgres://bookstore@127.0.0.1:1/bookstore".to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy_with(config.database.connect_options().unwrap());
        app(AppState::new(config, pool))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_ok_without_database() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_readiness_reports_unreachable_database() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected_before_database() {
        let body = r#"{"customerName":"Budi","bookName":"Laskar Pelangi","quantity":0}"#;
        let response = test_app()
            .oneshot(json_request("POST", "/api/wishlist-item", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "quantity must be at least 1 (got 0)"
        );
    }

    #[tokio::test]
    async fn test_delete_validates_quantity_too() {
        let body = r#"{"customerName":"Budi","bookName":"Laskar Pelangi","quantity":-3}"#;
        let response = test_app()
            .oneshot(json_request("DELETE", "/api/wishlist-item", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_customer_name_is_bad_request() {
        let body = r#"{"name":"  ","address":"Jl. Merdeka 1","phone":"0812"}"#;
        let response = test_app()
            .oneshot(json_request("POST", "/api/customers", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "name is required");
    }

    #[tokio::test]
    async fn test_invalid_account_email_is_bad_request() {
        let body = r#"{"name":"Budi","username":"budi","password":"s3cret","email":"not-an-email"}"#;
        let response = test_app()
            .oneshot(json_request("POST", "/api/account", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message = body_json(response).await["message"].as_str().unwrap().to_string();
        assert!(message.starts_with("invalid email"), "{message}");
    }

    #[tokio::test]
    async fn test_malformed_json_gets_json_message() {
        let response = test_app()
            .oneshot(json_request("POST", "/api/customers", "{"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_missing_field_is_client_error() {
        let response = test_app()
            .oneshot(json_request("POST", "/api/wishlist-item", r#"{"customerName":"Budi"}"#))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert!(body_json(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_database_failure_is_generic_500() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/books").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = test_app()
            .oneshot(Request::builder().uri("/api/authors").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
