//! Shipping fee computation for a matched zone.

use serde::{Deserialize, Serialize};

use crate::types::Money;

use super::zone::ShippingZone;

/// How a quote's fee was arrived at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// The zone's fee applies.
    Charged,
    /// The order reached the zone's free-shipping threshold.
    FreeThreshold,
    /// No zone covers the destination; the fee is not determinable.
    Unserviceable,
}

/// The result of resolving shipping for one destination and order total.
///
/// A zero `shipping_cost` is ambiguous on its own: check [`Self::status`]
/// before showing it to a buyer as "free".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuote {
    pub shipping_cost: Money,
    pub zone: Option<ShippingZone>,
    pub free_shipping_applied: bool,
}

impl ShippingQuote {
    /// A quote for a destination no zone covers.
    #[must_use]
    pub const fn unserviceable() -> Self {
        Self {
            shipping_cost: Money::ZERO,
            zone: None,
            free_shipping_applied: false,
        }
    }

    /// Classify the quote.
    #[must_use]
    pub fn status(&self) -> QuoteStatus {
        match (&self.zone, self.free_shipping_applied) {
            (None, _) => QuoteStatus::Unserviceable,
            (Some(_), true) => QuoteStatus::FreeThreshold,
            (Some(_), false) => QuoteStatus::Charged,
        }
    }

    /// The threshold that waived the fee, if one did.
    #[must_use]
    pub fn threshold_met(&self) -> Option<Money> {
        if !self.free_shipping_applied {
            return None;
        }
        self.zone.as_ref().and_then(|z| z.free_shipping_threshold)
    }
}

/// Compute the shipping fee for `zone` and an order subtotal.
///
/// - No zone: zero fee, no zone.
/// - Threshold configured and `order_total >= threshold`: zero fee.
/// - Otherwise: the zone's fee.
#[must_use]
pub fn calculate(zone: Option<&ShippingZone>, order_total: Money) -> ShippingQuote {
    let Some(zone) = zone else {
        return ShippingQuote::unserviceable();
    };

    let free = zone
        .free_shipping_threshold
        .is_some_and(|threshold| order_total >= threshold);

    ShippingQuote {
        shipping_cost: if free { Money::ZERO } else { zone.shipping_cost },
        zone: Some(zone.clone()),
        free_shipping_applied: free,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shipping::zone::DeliveryEstimate;
    use crate::types::{CountryCode, LocalizedText, ZoneId};

    fn money(minor: i64) -> Money {
        Money::from_minor(minor).unwrap()
    }

    fn zone(cost: i64, threshold: Option<i64>) -> ShippingZone {
        ShippingZone {
            id: ZoneId::new(1),
            name: LocalizedText::new("France", "France", "Francia").unwrap(),
            countries: vec![CountryCode::parse("FR").unwrap()],
            regions: Vec::new(),
            shipping_cost: money(cost),
            free_shipping_threshold: threshold.map(money),
            estimated_delivery_days: DeliveryEstimate { min: 3, max: 7 },
            is_active: true,
            priority: 1,
        }
    }

    #[test]
    fn test_no_zone() {
        let quote = calculate(None, money(10_000));
        assert_eq!(quote, ShippingQuote::unserviceable());
        assert_eq!(quote.status(), QuoteStatus::Unserviceable);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let z = zone(3500, Some(50_000));

        let below = calculate(Some(&z), money(49_999));
        assert_eq!(below.shipping_cost, money(3500));
        assert_eq!(below.status(), QuoteStatus::Charged);
        assert_eq!(below.threshold_met(), None);

        let at = calculate(Some(&z), money(50_000));
        assert_eq!(at.shipping_cost, Money::ZERO);
        assert_eq!(at.status(), QuoteStatus::FreeThreshold);
        assert_eq!(at.threshold_met(), Some(money(50_000)));
    }

    #[test]
    fn test_no_threshold_always_charges() {
        let z = zone(1200, None);
        for total in [0, 1, 50_000, i64::MAX] {
            assert_eq!(calculate(Some(&z), money(total)).shipping_cost, money(1200));
        }
    }

    #[test]
    fn test_zero_threshold_is_always_free() {
        let z = zone(1200, Some(0));
        let quote = calculate(Some(&z), Money::ZERO);
        assert_eq!(quote.shipping_cost, Money::ZERO);
        assert!(quote.free_shipping_applied);
    }

    #[test]
    fn test_quote_serializes_null_zone() {
        let json = serde_json::to_value(ShippingQuote::unserviceable()).unwrap();
        assert_eq!(json["shippingCost"], 0);
        assert!(json["zone"].is_null());
        assert_eq!(json["freeShippingApplied"], false);
    }
}
