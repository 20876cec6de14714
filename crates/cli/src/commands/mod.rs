//! CLI subcommand implementations.

pub mod migrate;
pub mod quote;
pub mod zones;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by commands that talk to the database.
#[derive(Debug, Error)]
pub enum DatabaseUrlError {
    /// Neither connection variable is set.
    #[error("Missing environment variable: ADMIN_DATABASE_URL (or DATABASE_URL)")]
    Missing,
}

/// Read the admin database URL, falling back to `DATABASE_URL`.
///
/// Loads `.env` first if present.
///
/// # Errors
///
/// Returns `DatabaseUrlError::Missing` if neither variable is set.
pub fn database_url() -> Result<SecretString, DatabaseUrlError> {
    dotenvy::dotenv().ok();

    std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| DatabaseUrlError::Missing)
}
