//! Bookstore Core - Shared domain types.
//!
//! Types used by both the HTTP server and the CLI:
//! - `server` - JSON API over the bookstore database
//! - `cli` - Migrations and sample data
//!
//! The core crate holds only types: no I/O, no database access, no HTTP.
//! Enabling the `postgres` feature adds `sqlx` encode/decode support for the
//! ID newtypes.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, validated email addresses and order quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
