//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STORE_CURRENCY` - ISO 4217 store currency (default: XOF)
//! - `CHECKOUT_TAX_RATE` - Flat tax rate between 0 and 1 (default: 0.10)
//! - `ZONE_CACHE_TTL_SECS` - How long a shipping zone snapshot is reused (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use nature_pharmacy_core::CurrencyCode;
use nature_pharmacy_core::checkout::{CheckoutContext, TaxRate};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Currency every price is expressed in
    pub currency: CurrencyCode,
    /// Flat checkout tax rate
    pub tax_rate: TaxRate,
    /// Lifetime of the cached shipping zone snapshot
    pub zone_cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;
        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let currency = parse_env("STORE_CURRENCY", "XOF")?;
        let tax_rate = parse_env("CHECKOUT_TAX_RATE", "0.10")?;
        let zone_cache_ttl = Duration::from_secs(parse_env("ZONE_CACHE_TTL_SECS", "60")?);

        Ok(Self {
            database_url,
            host,
            port,
            currency,
            tax_rate,
            zone_cache_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Pricing settings handed to the checkout calculator.
    #[must_use]
    pub const fn checkout_context(&self) -> CheckoutContext {
        CheckoutContext {
            tax_rate: self.tax_rate,
            currency: self.currency,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            currency: CurrencyCode::XOF,
            tax_rate: TaxRate::STANDARD,
            zone_cache_ttl: Duration::from_secs(60),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_checkout_context() {
        let mut config = config();
        config.currency = CurrencyCode::EUR;
        let context = config.checkout_context();
        assert_eq!(context.currency, CurrencyCode::EUR);
        assert_eq!(context.tax_rate.as_decimal(), Decimal::new(10, 2));
    }

    #[test]
    fn test_parse_value_tax_rate() {
        let rate: TaxRate = parse_value("CHECKOUT_TAX_RATE", " 0.18 ").unwrap();
        assert_eq!(rate.as_decimal(), Decimal::new(18, 2));

        let err = parse_value::<TaxRate>("CHECKOUT_TAX_RATE", "1.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "CHECKOUT_TAX_RATE"));
    }

    #[test]
    fn test_parse_value_currency() {
        let currency: CurrencyCode = parse_value("STORE_CURRENCY", "eur").unwrap();
        assert_eq!(currency, CurrencyCode::EUR);
        assert!(parse_value::<CurrencyCode>("STORE_CURRENCY", "GBP").is_err());
    }

    #[test]
    fn test_parse_value_port() {
        assert!(parse_value::<u16>("STOREFRONT_PORT", "70000").is_err());
        assert_eq!(parse_value::<u16>("STOREFRONT_PORT", "8080").unwrap(), 8080);
    }
}
