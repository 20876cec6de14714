//! Offline shipping quote from a zone file.
//!
//! Runs the same resolution the storefront runs, against zones read from a
//! file instead of the database. Useful to check a zone file before import.
//!
//! # Usage
//!
//! ```bash
//! npharm quote --zones zones.yaml --country SN --region Dakar --total 10000
//! ```

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use nature_pharmacy_core::shipping::{self, QuoteStatus, ShippingError, ShippingQuote};

use super::zones::{self, ZoneFileError};

/// Errors that can occur while quoting.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    ZoneFile(#[from] ZoneFileError),

    #[error("Invalid request: {0}")]
    Shipping(#[from] ShippingError),

    #[error("Failed to serialize quote: {0}")]
    Json(#[from] serde_json::Error),
}

/// A quote with its classification, as printed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteOutput {
    #[serde(flatten)]
    pub quote: ShippingQuote,
    pub status: QuoteStatus,
}

/// Resolve a quote against the zones of `path`.
///
/// Zones get IDs `1..=n` in file order.
///
/// # Errors
///
/// Returns `QuoteError` if the zone file is invalid or the destination or
/// total is malformed.
pub fn compute(
    path: &Path,
    country: &str,
    region: Option<&str>,
    total: i64,
) -> Result<QuoteOutput, QuoteError> {
    let zones = zones::into_zones(zones::load(path)?);
    let quote = shipping::resolve(country, region, total, &zones)?;

    Ok(QuoteOutput {
        status: quote.status(),
        quote,
    })
}

/// `npharm quote`
///
/// Prints the quote as pretty JSON on stdout.
///
/// # Errors
///
/// See [`compute`].
pub fn run(
    path: &Path,
    country: &str,
    region: Option<&str>,
    total: i64,
) -> Result<(), QuoteError> {
    let output = compute(path, country, region, total)?;

    tracing::debug!(status = ?output.status, cost = %output.quote.shipping_cost, "Resolved quote");

    let json = serde_json::to_string_pretty(&output)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
