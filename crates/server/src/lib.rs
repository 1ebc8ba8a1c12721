//! Bookstore server library.
//!
//! Everything the `bookstore-server` binary runs lives here so the router can
//! be built and exercised from tests without binding a port.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

pub use config::BookstoreConfig;
pub use routes::app;
pub use state::AppState;
