//! User account queries.
//!
//! These run on a caller-owned connection so the account service can chain
//! them with the customer lookup in one transaction.

use sqlx::PgConnection;

use bookstore_core::{AccountId, CustomerId, Email};

use super::RepositoryError;

/// Column values written for an account.
#[derive(Debug, Clone, Copy)]
pub struct AccountRow<'a> {
    pub customer_id: CustomerId,
    pub username: &'a str,
    /// Argon2 PHC string, never the plaintext password.
    pub password_hash: &'a str,
    pub email: &'a Email,
}

/// ID of the account with `username`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_id_by_username(
    conn: &mut PgConnection,
    username: &str,
) -> Result<Option<AccountId>, RepositoryError> {
    let id = sqlx::query_scalar::<_, AccountId>(
        "SELECT user_id FROM User_Account WHERE username = $1 LIMIT 1",
    )
    .bind(username)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}

/// Point an existing account at `row.customer_id` and replace its credentials.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if the account vanished,
/// `RepositoryError::Database` if the statement fails.
pub async fn update(
    conn: &mut PgConnection,
    id: AccountId,
    row: AccountRow<'_>,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE User_Account
        SET customer_on_id = $1, passwordu = $2, email = $3
        WHERE user_id = $4
        ",
    )
    .bind(row.customer_id)
    .bind(row.password_hash)
    .bind(row.email.as_str())
    .bind(id)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound("user account"));
    }
    Ok(())
}

/// Insert a new account.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the statement fails.
pub async fn insert(
    conn: &mut PgConnection,
    row: AccountRow<'_>,
) -> Result<AccountId, RepositoryError> {
    let id = sqlx::query_scalar::<_, AccountId>(
        r"
        INSERT INTO User_Account (customer_on_id, username, passwordu, email)
        VALUES ($1, $2, $3, $4)
        RETURNING user_id
        ",
    )
    .bind(row.customer_id)
    .bind(row.username)
    .bind(row.password_hash)
    .bind(row.email.as_str())
    .fetch_one(conn)
    .await?;
    Ok(id)
}
