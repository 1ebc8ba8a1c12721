//! Multi-step operations that chain lookups inside one transaction.

pub mod account;
pub mod wishlist;

pub use account::{AccountError, AccountService};
pub use wishlist::{WishlistError, WishlistService};
