//! Subcommand implementations.

pub mod migrate;
pub mod seed;

use bookstore_server::config::{ConfigError, DatabaseConfig};
use sqlx::PgPool;
use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect with the server's database settings.
async fn connect() -> Result<PgPool, CommandError> {
    let config = DatabaseConfig::from_env()?;
    tracing::info!(host = %config.host, database = %config.name, "Connecting to database...");
    Ok(bookstore_server::db::create_pool(&config).await?)
}
