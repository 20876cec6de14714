//! Database row types for the `pharmacy` schema.
//!
//! Rows are decoded with `sqlx::FromRow` and converted into domain types with
//! `TryFrom`, so a malformed row surfaces as a [`RecordError`] instead of a
//! zone or coupon that silently breaks its invariants.

use chrono::{DateTime, Utc};
use sqlx::types::Json;

use crate::checkout::{Coupon, CouponCode, CouponConfigError, Discount};
use crate::shipping::{DeliveryEstimate, ShippingZone, ZoneError};
use crate::types::{CountryCode, CountryCodeError, CouponId, LocalizedText, Money, ZoneId};

/// Column value for [`Discount::Percentage`].
pub const DISCOUNT_PERCENTAGE: &str = "percentage";
/// Column value for [`Discount::FixedAmount`].
pub const DISCOUNT_FIXED_AMOUNT: &str = "fixed_amount";

/// A stored row that does not convert into a valid domain value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("zone {id} has an invalid country code: {source}")]
    Country {
        id: ZoneId,
        #[source]
        source: CountryCodeError,
    },

    #[error("zone {id} is misconfigured: {source}")]
    Zone {
        id: ZoneId,
        #[source]
        source: ZoneError,
    },

    #[error("zone {0} has a delivery window outside 0..=65535 days")]
    DeliveryDays(ZoneId),

    #[error("coupon {id} is misconfigured: {source}")]
    Coupon {
        id: CouponId,
        #[source]
        source: CouponConfigError,
    },

    #[error("coupon {id} has unknown discount kind {kind:?}")]
    DiscountKind { id: CouponId, kind: String },

    #[error("coupon {0} has an out-of-range discount value")]
    DiscountValue(CouponId),

    #[error("coupon {0} has a negative usage count or limit")]
    Usage(CouponId),
}

/// A row of `pharmacy.shipping_zone`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShippingZoneRecord {
    pub id: ZoneId,
    pub name: Json<LocalizedText>,
    pub countries: Vec<String>,
    pub regions: Vec<String>,
    pub shipping_cost: Money,
    pub free_shipping_threshold: Option<Money>,
    pub delivery_days_min: i16,
    pub delivery_days_max: i16,
    pub is_active: bool,
    pub priority: i32,
}

impl TryFrom<ShippingZoneRecord> for ShippingZone {
    type Error = RecordError;

    fn try_from(row: ShippingZoneRecord) -> Result<Self, Self::Error> {
        let id = row.id;
        let countries = row
            .countries
            .iter()
            .map(|c| CountryCode::parse(c))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| RecordError::Country { id, source })?;
        let min = u16::try_from(row.delivery_days_min).map_err(|_| RecordError::DeliveryDays(id))?;
        let max = u16::try_from(row.delivery_days_max).map_err(|_| RecordError::DeliveryDays(id))?;

        let zone = Self {
            id,
            name: row.name.0,
            countries,
            regions: row.regions,
            shipping_cost: row.shipping_cost,
            free_shipping_threshold: row.free_shipping_threshold,
            estimated_delivery_days: DeliveryEstimate { min, max },
            is_active: row.is_active,
            priority: row.priority,
        };
        zone.validate()
            .map_err(|source| RecordError::Zone { id, source })?;
        Ok(zone)
    }
}

/// A row of `pharmacy.coupon`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CouponRecord {
    pub id: CouponId,
    pub code: String,
    pub discount_kind: String,
    pub discount_value: i64,
    pub minimum_order_amount: Option<Money>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = RecordError;

    fn try_from(row: CouponRecord) -> Result<Self, Self::Error> {
        let id = row.id;
        let code =
            CouponCode::parse(&row.code).map_err(|source| RecordError::Coupon { id, source })?;
        let discount = match row.discount_kind.as_str() {
            DISCOUNT_PERCENTAGE => u32::try_from(row.discount_value)
                .map(Discount::Percentage)
                .map_err(|_| RecordError::DiscountValue(id))?,
            DISCOUNT_FIXED_AMOUNT => Money::from_minor(row.discount_value)
                .map(Discount::FixedAmount)
                .map_err(|_| RecordError::DiscountValue(id))?,
            _ => {
                return Err(RecordError::DiscountKind {
                    id,
                    kind: row.discount_kind,
                });
            }
        };
        let usage_limit = row
            .usage_limit
            .map(u32::try_from)
            .transpose()
            .map_err(|_| RecordError::Usage(id))?;
        let used_count = u32::try_from(row.used_count).map_err(|_| RecordError::Usage(id))?;

        Ok(Self {
            id,
            code,
            discount,
            minimum_order_amount: row.minimum_order_amount,
            starts_at: row.starts_at,
            expires_at: row.expires_at,
            usage_limit,
            used_count,
            is_active: row.is_active,
        })
    }
}

/// Split a discount into its `(discount_kind, discount_value)` columns.
#[must_use]
pub fn discount_columns(discount: Discount) -> (&'static str, i64) {
    match discount {
        Discount::Percentage(bps) => (DISCOUNT_PERCENTAGE, i64::from(bps)),
        Discount::FixedAmount(amount) => (DISCOUNT_FIXED_AMOUNT, amount.as_minor()),
    }
}
