//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_API_TOKEN` - Bearer token for `/api/*` (min 32 chars, randomly generated)
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 1.0)
//!
//! ## Optional (TLS)
//! - `ADMIN_TLS_CERT` - PEM-encoded certificate chain
//! - `ADMIN_TLS_KEY` - PEM-encoded private key
//!
//! Set both TLS variables or neither.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Shortest accepted `ADMIN_API_TOKEN`.
pub const MIN_API_TOKEN_LENGTH: usize = 32;

/// Shannon entropy floor for `ADMIN_API_TOKEN`, in bits per character.
const MIN_TOKEN_ENTROPY: f64 = 3.3;

/// Fragments that mark a token as copied from documentation.
const PLACEHOLDER_FRAGMENTS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "token",
    "xxx",
    "todo",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("ADMIN_API_TOKEN rejected: {0}")]
    WeakApiToken(#[from] WeakTokenError),
}

/// Why an API token was refused.
#[derive(Debug, Error, PartialEq)]
pub enum WeakTokenError {
    #[error("must be at least {min} characters (got {0})", min = MIN_API_TOKEN_LENGTH)]
    TooShort(usize),
    #[error("looks like a placeholder (contains '{0}')")]
    Placeholder(&'static str),
    #[error("entropy too low ({0:.2} bits/char); use a randomly generated token")]
    LowEntropy(f64),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer token required on every `/api/*` request
    pub api_token: SecretString,
    /// Emit JSON logs instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
    /// Serve HTTPS directly with these PEMs
    pub tls: Option<TlsConfig>,
}

/// Certificate chain and private key for direct HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    pub cert_pem: String,
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &format_args!("{} bytes", self.cert_pem.len()))
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if `ADMIN_API_TOKEN` is too weak to guard the API.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api_token = std::env::var("ADMIN_API_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("ADMIN_API_TOKEN".to_string()))?;
        check_api_token(&api_token)?;

        let tls = match (
            get_optional_env("ADMIN_TLS_CERT"),
            get_optional_env("ADMIN_TLS_KEY"),
        ) {
            (Some(cert_pem), Some(key)) => Some(TlsConfig {
                cert_pem,
                key_pem: SecretString::from(key),
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::InvalidEnvVar(
                    "ADMIN_TLS_CERT/ADMIN_TLS_KEY".to_string(),
                    "set both or neither".to_string(),
                ));
            }
        };

        Ok(Self {
            database_url: get_database_url("ADMIN_DATABASE_URL")?,
            host: parse_env("ADMIN_HOST", "127.0.0.1")?,
            port: parse_env("ADMIN_PORT", "3001")?,
            api_token: SecretString::from(api_token),
            json_logs: get_optional_env("LOG_FORMAT")
                .is_some_and(|format| format.eq_ignore_ascii_case("json")),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "1.0")?,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Refuse tokens that are short, copied from docs, or visibly non-random.
///
/// # Errors
///
/// Returns the first [`WeakTokenError`] the token trips.
pub fn check_api_token(token: &str) -> Result<(), WeakTokenError> {
    let length = token.chars().count();
    if length < MIN_API_TOKEN_LENGTH {
        return Err(WeakTokenError::TooShort(length));
    }

    let lower = token.to_lowercase();
    if let Some(fragment) = PLACEHOLDER_FRAGMENTS
        .iter()
        .copied()
        .find(|f| lower.contains(f))
    {
        return Err(WeakTokenError::Placeholder(fragment));
    }

    let entropy = bits_per_char(token);
    if entropy < MIN_TOKEN_ENTROPY {
        return Err(WeakTokenError::LowEntropy(entropy));
    }
    Ok(())
}

/// Shannon entropy of the character distribution.
#[allow(clippy::cast_precision_loss)] // token lengths are far below 2^52
fn bits_per_char(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0_usize;
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    counts
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum()
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional, non-blank environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
