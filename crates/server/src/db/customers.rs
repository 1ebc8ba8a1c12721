//! Online customer queries.
//!
//! Customers are identified by name; nothing in the schema makes the name
//! unique, so lookups take the lowest matching id.

use sqlx::{PgConnection, PgPool};

use bookstore_core::CustomerId;

use super::{RepositoryError, begin_serializable, finish, retry_on_conflict};
use crate::models::Upserted;
use crate::models::customer::CustomerUpsert;

/// Repository for `Customer_Online`.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Update the customer's address and phone, or insert the customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::SerializationFailure` if concurrent writers
    /// kept aborting the transaction, `RepositoryError::Database` otherwise.
    pub async fn upsert(
        &self,
        customer: &CustomerUpsert,
    ) -> Result<Upserted<CustomerId>, RepositoryError> {
        retry_on_conflict("upsert_customer", move || async move {
            let mut tx = begin_serializable(self.pool).await?;
            let outcome = upsert_in(&mut tx, customer).await;
            finish(tx, outcome).await
        })
        .await
    }
}

async fn upsert_in(
    conn: &mut PgConnection,
    customer: &CustomerUpsert,
) -> Result<Upserted<CustomerId>, RepositoryError> {
    if let Some(id) = find_id_by_name(conn, &customer.name).await? {
        sqlx::query(
            "UPDATE Customer_Online SET address = $1, phone = $2 WHERE customer_on_id = $3",
        )
        .bind(&customer.address)
        .bind(&customer.phone)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        tracing::info!(customer_id = %id, "Customer updated");
        return Ok(Upserted::Updated(id));
    }

    let id = sqlx::query_scalar::<_, CustomerId>(
        r"
        INSERT INTO Customer_Online (name_customer_online, address, phone)
        VALUES ($1, $2, $3)
        RETURNING customer_on_id
        ",
    )
    .bind(&customer.name)
    .bind(&customer.address)
    .bind(&customer.phone)
    .fetch_one(&mut *conn)
    .await?;

    tracing::info!(customer_id = %id, "Customer created");
    Ok(Upserted::Created(id))
}

/// ID of the first customer named `name`.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn find_id_by_name(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<CustomerId>, RepositoryError> {
    let id = sqlx::query_scalar::<_, CustomerId>(
        r"
        SELECT customer_on_id FROM Customer_Online
        WHERE name_customer_online = $1
        ORDER BY customer_on_id
        LIMIT 1
        ",
    )
    .bind(name)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}
