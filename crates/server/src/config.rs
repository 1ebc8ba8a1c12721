//! Server configuration loaded from environment variables.
//!
//! A local override file (`development.env`, or the path in
//! `BOOKSTORE_ENV_FILE`) is loaded first with override semantics, so values
//! in the file win over the process environment.
//!
//! # Environment Variables
//!
//! ## Database
//! - `DATABASE_URL` - Full `PostgreSQL` connection string (wins over the parts below)
//! - `DB_USER` - Database user (required without `DATABASE_URL`)
//! - `DB_NAME` - Database name (required without `DATABASE_URL`)
//! - `DB_HOST` - Database host (default: localhost)
//! - `DB_PASSWORD` - Database password (default: empty)
//! - `DB_PORT` - Database port (default: 5432)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
//!
//! ## Server
//! - `APP_HOST` - Bind address (default: 0.0.0.0)
//! - `APP_PORT` - Listen port (default: 3880)
//! - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

/// Override file loaded before reading variables.
pub const DEFAULT_ENV_FILE: &str = "development.env";

const DEFAULT_APP_PORT: &str = "3880";
const DEFAULT_DB_PORT: &str = "5432";
const DEFAULT_MAX_CONNECTIONS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct BookstoreConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Database connection settings.
///
/// Implements `Debug` manually to redact the password and URL.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection string, used instead of the parts when present
    pub url: Option<SecretString>,
    pub user: String,
    pub host: String,
    pub name: String,
    pub password: SecretString,
    pub port: u16,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .field("host", &self.host)
            .field("name", &self.name)
            .field("password", &"[REDACTED]")
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl BookstoreConfig {
    /// Load configuration from the override file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_file();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&var);

        let database = DatabaseConfig::from_vars(&vars)?;
        let host = vars.parse_or("APP_HOST", "0.0.0.0")?;
        let port = vars.parse_or("APP_PORT", DEFAULT_APP_PORT)?;
        let log_format = vars.parse_or("LOG_FORMAT", "pretty")?;
        let sentry_dsn = vars.optional("SENTRY_DSN");

        Ok(Self {
            database,
            host,
            port,
            log_format,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Load only the database settings (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_env_file();
        Self::from_vars(&Vars(&|key: &str| std::env::var(key).ok()))
    }

    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        let url = vars.optional("DATABASE_URL").map(SecretString::from);

        // Individual parts are only mandatory when no URL is given
        let (user, name) = if url.is_some() {
            (
                vars.optional("DB_USER").unwrap_or_default(),
                vars.optional("DB_NAME").unwrap_or_default(),
            )
        } else {
            (vars.required("DB_USER")?, vars.required("DB_NAME")?)
        };

        let max_connections: u32 = vars.parse_or("DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            url,
            user,
            host: vars.or_default("DB_HOST", "localhost"),
            name,
            password: SecretString::from(vars.or_default("DB_PASSWORD", "")),
            port: vars.parse_or("DB_PORT", DEFAULT_DB_PORT)?,
            max_connections,
        })
    }

    /// Connection options for `sqlx`.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Configuration` if `DATABASE_URL` cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url.expose_secret());
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);

        let password = self.password.expose_secret();
        if !password.is_empty() {
            options = options.password(password);
        }

        Ok(options)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Load the override env file, if present.
fn load_env_file() {
    let path = std::env::var("BOOKSTORE_ENV_FILE")
        .map_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE), PathBuf::from);

    match dotenvy::from_path_override(&path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Loaded env override file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable env file"),
    }
}

/// Variable source with typed accessors.
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    /// Non-empty value of `key`.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}
