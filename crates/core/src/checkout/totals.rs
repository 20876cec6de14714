//! Order totals: subtotal, discount, shipping and tax.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shipping::ShippingQuote;
use crate::types::{CurrencyCode, Money, ProductId};

use super::CheckoutError;

/// A flat tax rate between 0 and 1 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TaxRate(Decimal);

/// Error returned for a tax rate outside `0..=1`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("tax rate must be between 0 and 1 (got {0})")]
pub struct TaxRateError(pub Decimal);

impl TaxRate {
    /// The store's historical flat rate of 10%.
    pub const STANDARD: Self = Self(Decimal::from_parts(10, 0, 0, false, 2));

    /// Build a rate.
    ///
    /// # Errors
    ///
    /// Returns [`TaxRateError`] if `rate` is negative or above one.
    pub fn new(rate: Decimal) -> Result<Self, TaxRateError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(TaxRateError(rate));
        }
        Ok(Self(rate))
    }

    /// The rate as a decimal fraction.
    #[must_use]
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TryFrom<Decimal> for TaxRate {
    type Error = TaxRateError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        Self::new(rate)
    }
}

impl From<TaxRate> for Decimal {
    fn from(rate: TaxRate) -> Self {
        rate.0
    }
}

impl FromStr for TaxRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rate = Decimal::from_str(s.trim()).map_err(|e| e.to_string())?;
        Self::new(rate).map_err(|e| e.to_string())
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product line of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub unit_price: Money,
    pub quantity: u32,
}

/// Sum the cart lines.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for no lines,
/// [`CheckoutError::InvalidQuantity`] for a zero quantity and
/// [`CheckoutError::Amount`] on overflow.
pub fn subtotal(lines: &[CartLine]) -> Result<Money, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    lines.iter().try_fold(Money::ZERO, |acc, line| {
        if line.quantity == 0 {
            return Err(CheckoutError::InvalidQuantity {
                product_id: line.product_id,
            });
        }
        Ok(acc.checked_add(line.unit_price.checked_mul(line.quantity)?)?)
    })
}

/// The priced breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub currency: CurrencyCode,
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Combine the order's parts into totals.
    ///
    /// Tax is the flat `tax_rate` applied to `subtotal`, independent of the
    /// destination. `total = subtotal - discount + shipping + tax`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Unserviceable`] if the quote has no zone and
    /// [`CheckoutError::Amount`] on overflow.
    pub fn compute(
        subtotal: Money,
        discount: Money,
        quote: &ShippingQuote,
        tax_rate: TaxRate,
        currency: CurrencyCode,
    ) -> Result<Self, CheckoutError> {
        if quote.zone.is_none() {
            return Err(CheckoutError::Unserviceable);
        }
        let discount = discount.min(subtotal);
        let tax = subtotal.apply_rate(tax_rate.as_decimal())?;
        let total = subtotal
            .saturating_sub(discount)
            .checked_add(quote.shipping_cost)
            .and_then(|t| t.checked_add(tax))
            .map_err(CheckoutError::from)?;

        Ok(Self {
            currency,
            subtotal,
            discount,
            shipping: quote.shipping_cost,
            tax,
            total,
        })
    }
}
