//! Shipping cost resolution.
//!
//! [`resolve`] is the single entry point used by checkout: it picks the best
//! zone for a destination ([`match_zone`]) and then computes the fee for the
//! order subtotal ([`calculate`]). Both steps are pure functions of their
//! inputs; the zone collection is an immutable snapshot owned by the caller.
//!
//! ```
//! use nature_pharmacy_core::shipping::{self, DeliveryEstimate, ShippingZone};
//! use nature_pharmacy_core::{CountryCode, LocalizedText, Money, ZoneId};
//!
//! let zones = vec![ShippingZone {
//!     id: ZoneId::new(1),
//!     name: LocalizedText::new("Sénégal", "Senegal", "Senegal").unwrap(),
//!     countries: vec![CountryCode::parse("SN").unwrap()],
//!     regions: vec![],
//!     shipping_cost: Money::from_minor(2000).unwrap(),
//!     free_shipping_threshold: Some(Money::from_minor(50_000).unwrap()),
//!     estimated_delivery_days: DeliveryEstimate { min: 1, max: 3 },
//!     is_active: true,
//!     priority: 1,
//! }];
//!
//! let quote = shipping::resolve("sn", None, 10_000, &zones).unwrap();
//! assert_eq!(quote.shipping_cost.as_minor(), 2000);
//! ```

pub mod calculator;
pub mod matcher;
pub mod zone;

use serde::{Deserialize, Serialize};

use crate::types::{CountryCode, CountryCodeError, Money, MoneyError, ZoneId};

pub use calculator::{QuoteStatus, ShippingQuote, calculate};
pub use matcher::match_zone;
pub use zone::{
    DeliveryEstimate, MAX_DELIVERY_DAYS, ShippingZone, ZoneDraft, ZoneError, normalize_region,
};

/// Errors returned by [`resolve`].
///
/// The country and order-total variants are caller mistakes (invalid input)
/// and should be rejected before checkout proceeds. A destination that no
/// zone covers is not an error; see [`QuoteStatus::Unserviceable`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShippingError {
    /// The destination country is empty or malformed.
    #[error("invalid country: {0}")]
    InvalidCountry(#[from] CountryCodeError),
    /// The order total is negative.
    #[error("invalid order total: {0}")]
    InvalidOrderTotal(#[from] MoneyError),
    /// A zone in the collection breaks its invariants.
    #[error("zone {id} is misconfigured: {source}")]
    InvalidZone {
        /// The offending zone.
        id: ZoneId,
        /// What is wrong with it.
        #[source]
        source: ZoneError,
    },
}

/// A shipping quote request as received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRequest {
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    pub order_total: i64,
}

/// Resolve the shipping quote for a destination and order subtotal.
///
/// Idempotent and side-effect free.
///
/// # Errors
///
/// Returns [`ShippingError::InvalidCountry`] if `country` is not a two-letter
/// code and [`ShippingError::InvalidOrderTotal`] if `order_total` is negative.
pub fn resolve(
    country: &str,
    region: Option<&str>,
    order_total: i64,
    zones: &[ShippingZone],
) -> Result<ShippingQuote, ShippingError> {
    let country = CountryCode::parse(country)?;
    let order_total = Money::from_minor(order_total)?;
    Ok(quote(&country, region, order_total, zones))
}

/// Resolve a deserialized [`ShippingRequest`].
///
/// # Errors
///
/// See [`resolve`].
pub fn resolve_request(
    request: &ShippingRequest,
    zones: &[ShippingZone],
) -> Result<ShippingQuote, ShippingError> {
    resolve(
        &request.country,
        request.region.as_deref(),
        request.order_total,
        zones,
    )
}

/// Resolve with already-validated inputs.
#[must_use]
pub fn quote(
    country: &CountryCode,
    region: Option<&str>,
    order_total: Money,
    zones: &[ShippingZone],
) -> ShippingQuote {
    calculate(match_zone(country, region, zones), order_total)
}

/// Check every zone of a collection that did not come through admin validation.
///
/// # Errors
///
/// Returns [`ShippingError::InvalidZone`] for the first misconfigured zone.
pub fn validate_zones(zones: &[ShippingZone]) -> Result<(), ShippingError> {
    for zone in zones {
        zone.validate()
            .map_err(|source| ShippingError::InvalidZone {
                id: zone.id,
                source,
            })?;
    }
    Ok(())
}
