//! Checkout pricing.
//!
//! [`price_order`] combines the cart subtotal, an optional coupon, the
//! shipping quote for the destination and the flat tax rate into the
//! [`OrderTotals`] shown on the checkout summary. The free-shipping threshold
//! is evaluated against the discounted subtotal.

pub mod coupon;
pub mod totals;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shipping::{self, ShippingQuote, ShippingZone};
use crate::types::{CountryCode, CurrencyCode, MoneyError, ProductId};

pub use coupon::{Coupon, CouponCode, CouponConfigError, CouponDraft, CouponError, Discount};
pub use totals::{CartLine, OrderTotals, TaxRate, TaxRateError, subtotal};

/// Errors returned while pricing an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid quantity for product {product_id}")]
    InvalidQuantity { product_id: ProductId },

    #[error("no shipping zone serves this destination")]
    Unserviceable,

    #[error("coupon rejected: {0}")]
    Coupon(#[from] CouponError),

    #[error("amount error: {0}")]
    Amount(#[from] MoneyError),
}

/// Where an order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub country: CountryCode,
    #[serde(default)]
    pub region: Option<String>,
}

/// Store-wide pricing settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutContext {
    pub tax_rate: TaxRate,
    pub currency: CurrencyCode,
}

/// A fully priced order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedOrder {
    pub totals: OrderTotals,
    pub quote: ShippingQuote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<CouponCode>,
}

/// Price an order for a destination.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] or [`CheckoutError::InvalidQuantity`]
/// for a bad cart, [`CheckoutError::Coupon`] if the coupon does not apply and
/// [`CheckoutError::Unserviceable`] if no zone serves the destination.
pub fn price_order(
    lines: &[CartLine],
    coupon: Option<&Coupon>,
    destination: &Destination,
    zones: &[ShippingZone],
    context: &CheckoutContext,
    now: DateTime<Utc>,
) -> Result<PricedOrder, CheckoutError> {
    let subtotal = subtotal(lines)?;
    let discount = match coupon {
        Some(coupon) => coupon.apply(subtotal, now)?,
        None => crate::types::Money::ZERO,
    };

    let quote = shipping::quote(
        &destination.country,
        destination.region.as_deref(),
        subtotal.saturating_sub(discount),
        zones,
    );
    let totals = OrderTotals::compute(subtotal, discount, &quote, context.tax_rate, context.currency)?;

    Ok(PricedOrder {
        totals,
        quote,
        coupon_code: coupon.map(|c| c.code.clone()),
    })
}
