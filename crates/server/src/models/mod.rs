//! Request and row types for the bookstore API.
//!
//! Request types mirror the JSON bodies clients send and are turned into
//! validated commands before any database work. Row types are read straight
//! from queries with `sqlx::FromRow` and serialized back unchanged.

pub mod account;
pub mod book;
pub mod customer;
pub mod wishlist;

use thiserror::Error;

/// Outcome of an insert-or-update keyed by a natural identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upserted<T> {
    /// No row matched, a new one was inserted.
    Created(T),
    /// An existing row was updated in place.
    Updated(T),
}

impl<T> Upserted<T> {
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::Updated(value) => value,
        }
    }
}

/// A request body failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Trimmed `value`, or an error naming `field` if it is blank.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upserted_accessors() {
        let created = Upserted::Created(7);
        assert!(created.is_created());
        assert_eq!(created.into_inner(), 7);

        let updated = Upserted::Updated(14);
        assert!(!updated.is_created());
        assert_eq!(updated.into_inner(), 14);
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("name", "  Budi  "), Ok("Budi".to_string()));
        assert_eq!(
            require_text("name", " \t"),
            Err(ValidationError("name is required".to_string()))
        );
    }
}
