//! User account upsert request.

use secrecy::SecretString;
use serde::Deserialize;

use bookstore_core::Email;

use super::{ValidationError, require_text};

/// Body of `POST /api/account`.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Deserialize)]
pub struct AccountRequest {
    /// Name of the existing online customer the account belongs to.
    pub name: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl std::fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRequest")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .finish()
    }
}

/// A validated account upsert, keyed by `username`.
#[derive(Debug)]
pub struct AccountUpsert {
    pub customer_name: String,
    pub username: String,
    pub password: SecretString,
    pub email: Email,
}

impl TryFrom<AccountRequest> for AccountUpsert {
    type Error = ValidationError;

    fn try_from(request: AccountRequest) -> Result<Self, Self::Error> {
        if request.password.is_empty() {
            return Err(ValidationError("password is required".to_string()));
        }
        let email = Email::parse(&request.email)
            .map_err(|e| ValidationError(format!("invalid email: {e}")))?;

        Ok(Self {
            customer_name: require_text("name", &request.name)?,
            username: require_text("username", &request.username)?,
            password: SecretString::from(request.password),
            email,
        })
    }
}
