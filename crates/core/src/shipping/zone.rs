//! Shipping zone configuration.

use serde::{Deserialize, Serialize};

use crate::types::{CountryCode, LocalizedText, Money, ZoneId};

/// Errors in a zone's configuration.
///
/// These are raised when a zone is created or edited. The resolver assumes
/// the collection it receives has already passed [`ShippingZone::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// The zone serves no country.
    #[error("zone must serve at least one country")]
    NoCountries,
    /// A country is listed twice.
    #[error("country {0} is listed more than once")]
    DuplicateCountry(CountryCode),
    /// A region entry is blank.
    #[error("region names cannot be blank")]
    BlankRegion,
    /// The delivery window is inverted.
    #[error("delivery window is inverted (min {min} > max {max})")]
    InvalidDeliveryWindow {
        /// Minimum days.
        min: u16,
        /// Maximum days.
        max: u16,
    },
    /// The delivery window is longer than a year.
    #[error("delivery window cannot exceed 365 days (got {0})")]
    DeliveryWindowTooLong(u16),
}

/// Upper bound on a zone's delivery estimate, in days.
pub const MAX_DELIVERY_DAYS: u16 = 365;

/// Estimated delivery time in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryEstimate {
    pub min: u16,
    pub max: u16,
}

impl DeliveryEstimate {
    /// Build an estimate.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::InvalidDeliveryWindow`] if `min > max` and
    /// [`ZoneError::DeliveryWindowTooLong`] if `max` exceeds [`MAX_DELIVERY_DAYS`].
    pub const fn new(min: u16, max: u16) -> Result<Self, ZoneError> {
        if min > max {
            return Err(ZoneError::InvalidDeliveryWindow { min, max });
        }
        if max > MAX_DELIVERY_DAYS {
            return Err(ZoneError::DeliveryWindowTooLong(max));
        }
        Ok(Self { min, max })
    }
}

/// A configured shipping-cost rule keyed by destination country and region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingZone {
    pub id: ZoneId,
    pub name: LocalizedText,
    pub countries: Vec<CountryCode>,
    /// Empty means the zone covers every region of its countries.
    #[serde(default)]
    pub regions: Vec<String>,
    pub shipping_cost: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_shipping_threshold: Option<Money>,
    pub estimated_delivery_days: DeliveryEstimate,
    pub is_active: bool,
    /// Lower wins when several zones match the same destination.
    pub priority: i32,
}

impl ShippingZone {
    /// Build a zone from a validated draft and its storage ID.
    #[must_use]
    pub fn from_draft(id: ZoneId, draft: ZoneDraft) -> Self {
        Self {
            id,
            name: draft.name,
            countries: draft.countries,
            regions: draft.regions,
            shipping_cost: draft.shipping_cost,
            free_shipping_threshold: draft.free_shipping_threshold,
            estimated_delivery_days: draft.estimated_delivery_days,
            is_active: draft.is_active,
            priority: draft.priority,
        }
    }

    /// Check the zone's invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ZoneError> {
        check_coverage(
            &self.countries,
            &self.regions,
            self.estimated_delivery_days,
        )
    }

    /// Returns true if `country` is one of the zone's countries.
    #[must_use]
    pub fn serves_country(&self, country: &CountryCode) -> bool {
        self.countries.contains(country)
    }

    /// Returns true if the zone covers every region of its countries.
    #[must_use]
    pub fn is_country_wide(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns true if the zone explicitly lists `region`.
    ///
    /// `region` must already be normalized with [`normalize_region`].
    #[must_use]
    pub fn lists_region(&self, region: &str) -> bool {
        self.regions.iter().any(|r| normalize_region(r) == region)
    }
}

/// Zone fields as entered by an administrator, before an ID is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDraft {
    pub name: LocalizedText,
    pub countries: Vec<CountryCode>,
    #[serde(default)]
    pub regions: Vec<String>,
    pub shipping_cost: Money,
    #[serde(default)]
    pub free_shipping_threshold: Option<Money>,
    pub estimated_delivery_days: DeliveryEstimate,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub priority: i32,
}

const fn default_active() -> bool {
    true
}

impl ZoneDraft {
    /// Check the draft's invariants and trim region names.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validated(mut self) -> Result<Self, ZoneError> {
        self.regions = self
            .regions
            .into_iter()
            .map(|r| r.trim().to_owned())
            .collect();
        check_coverage(
            &self.countries,
            &self.regions,
            self.estimated_delivery_days,
        )?;
        Ok(self)
    }
}

/// Normalize a region name for comparison: trimmed and lower-cased.
///
/// Accents are kept, so "Thiès" and "Thies" stay distinct.
#[must_use]
pub fn normalize_region(region: &str) -> String {
    region.trim().to_lowercase()
}

fn check_coverage(
    countries: &[CountryCode],
    regions: &[String],
    delivery: DeliveryEstimate,
) -> Result<(), ZoneError> {
    if countries.is_empty() {
        return Err(ZoneError::NoCountries);
    }
    for (i, country) in countries.iter().enumerate() {
        if countries.iter().skip(i + 1).any(|other| other == country) {
            return Err(ZoneError::DuplicateCountry(country.clone()));
        }
    }
    if regions.iter().any(|r| r.trim().is_empty()) {
        return Err(ZoneError::BlankRegion);
    }
    DeliveryEstimate::new(delivery.min, delivery.max)?;
    Ok(())
}
