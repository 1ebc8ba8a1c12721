//! Account registration for online customers.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use bookstore_core::AccountId;

use crate::db::accounts::{self, AccountRow};
use crate::db::{self, RepositoryError, Retryable, customers};
use crate::models::Upserted;
use crate::models::account::AccountUpsert;

/// Errors from account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// No online customer has the requested name.
    #[error("Customer not found")]
    CustomerNotFound,

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl Retryable for AccountError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_retryable())
    }
}

/// Creates or updates the user account of an online customer.
pub struct AccountService<'a> {
    pool: &'a PgPool,
}

impl<'a> AccountService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Attach `account` to its customer, inserting or updating by username.
    ///
    /// The password is hashed once, before the transaction starts.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::CustomerNotFound` if no customer has the given
    /// name; the transaction is rolled back and no account row changes.
    pub async fn upsert(&self, account: &AccountUpsert) -> Result<Upserted<AccountId>, AccountError> {
        let hash = hash_password(account.password.expose_secret())?;
        let password_hash = hash.as_str();

        db::retry_on_conflict("upsert_account", move || async move {
            let mut tx = db::begin_serializable(self.pool).await?;
            let outcome = upsert_in(&mut tx, account, password_hash).await;
            db::finish(tx, outcome).await
        })
        .await
    }
}

async fn upsert_in(
    conn: &mut PgConnection,
    account: &AccountUpsert,
    password_hash: &str,
) -> Result<Upserted<AccountId>, AccountError> {
    let customer_id = customers::find_id_by_name(conn, &account.customer_name)
        .await?
        .ok_or(AccountError::CustomerNotFound)?;

    let row = AccountRow {
        customer_id,
        username: &account.username,
        password_hash,
        email: &account.email,
    };

    if let Some(id) = accounts::find_id_by_username(conn, &account.username).await? {
        accounts::update(conn, id, row).await?;
        tracing::info!(account_id = %id, customer_id = %customer_id, "User account updated");
        return Ok(Upserted::Updated(id));
    }

    let id = accounts::insert(conn, row).await?;
    tracing::info!(account_id = %id, customer_id = %customer_id, "User account created");
    Ok(Upserted::Created(id))
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}
