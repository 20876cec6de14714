//! Monetary amounts stored as integer minor units.
//!
//! Every price in the store (product prices, shipping fees, thresholds,
//! coupon amounts) is a [`Money`] value: a non-negative count of the store
//! currency's smallest unit. Rates and percentages go through
//! [`rust_decimal::Decimal`] so no floating-point drift is introduced.

use core::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when building or combining [`Money`] values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount is below zero.
    #[error("amount cannot be negative (got {0})")]
    Negative(i64),
    /// The result does not fit in 64 bits.
    #[error("amount is too large")]
    Overflow,
    /// A rate applied to an amount is below zero.
    #[error("rate cannot be negative")]
    NegativeRate,
}

/// A non-negative amount in minor currency units.
///
/// Serializes as a bare integer. Deserialization rejects negative values.
///
/// ```
/// use nature_pharmacy_core::Money;
///
/// let fee = Money::from_minor(3500).unwrap();
/// assert_eq!(fee.as_minor(), 3500);
/// assert!(Money::from_minor(-1).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    /// Zero in any currency.
    pub const ZERO: Self = Self(0);

    /// Build an amount from minor units.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Negative`] if `minor` is below zero.
    pub const fn from_minor(minor: i64) -> Result<Self, MoneyError> {
        if minor < 0 {
            return Err(MoneyError::Negative(minor));
        }
        Ok(Self(minor))
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn as_minor(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the sum does not fit.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Multiply by a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the product does not fit.
    pub fn checked_mul(self, quantity: u32) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(i64::from(quantity))
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Subtract, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }

    /// Multiply by a decimal rate, rounding half away from zero to whole
    /// minor units.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::NegativeRate`] for a negative rate and
    /// [`MoneyError::Overflow`] if the result does not fit.
    pub fn apply_rate(self, rate: Decimal) -> Result<Self, MoneyError> {
        if rate < Decimal::ZERO {
            return Err(MoneyError::NegativeRate);
        }
        let scaled = Decimal::from(self.0)
            .checked_mul(rate)
            .ok_or(MoneyError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        scaled.to_i64().map(Self).ok_or(MoneyError::Overflow)
    }
}

impl TryFrom<i64> for Money {
    type Error = MoneyError;

    fn try_from(minor: i64) -> Result<Self, Self::Error> {
        Self::from_minor(minor)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 4217 currencies the marketplace sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// West African CFA franc (no minor unit).
    #[default]
    XOF,
    EUR,
    USD,
}

impl CurrencyCode {
    /// Number of decimal places between the minor and major unit.
    #[must_use]
    pub const fn minor_unit_exponent(self) -> u32 {
        match self {
            Self::XOF => 0,
            Self::EUR | Self::USD => 2,
        }
    }

    /// The ISO code as a string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::XOF => "XOF",
            Self::EUR => "EUR",
            Self::USD => "USD",
        }
    }

    /// Format an amount for display (e.g. "35.00 EUR", "3500 XOF").
    #[must_use]
    pub fn format(self, amount: Money) -> String {
        let major = Decimal::new(amount.as_minor(), self.minor_unit_exponent());
        format!("{major} {}", self.code())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "XOF" => Ok(Self::XOF),
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Money {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Money {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let minor = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_minor(minor)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Money {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn money(minor: i64) -> Money {
        Money::from_minor(minor).unwrap()
    }

    #[test]
    fn test_rejects_negative() {
        assert_eq!(Money::from_minor(-5), Err(MoneyError::Negative(-5)));
    }

    #[test]
    fn test_checked_add_overflow() {
        assert_eq!(
            money(i64::MAX).checked_add(money(1)),
            Err(MoneyError::Overflow)
        );
        assert_eq!(money(2).checked_add(money(3)).unwrap(), money(5));
    }

    #[test]
    fn test_checked_mul() {
        assert_eq!(money(1250).checked_mul(3).unwrap(), money(3750));
        assert_eq!(money(i64::MAX).checked_mul(2), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_saturating_sub_clamps_at_zero() {
        assert_eq!(money(100).saturating_sub(money(250)), Money::ZERO);
        assert_eq!(money(250).saturating_sub(money(100)), money(150));
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // 10% of 1005 = 100.5 -> 101
        assert_eq!(money(1005).apply_rate(Decimal::new(10, 2)).unwrap(), money(101));
        // 10% of 1004 = 100.4 -> 100
        assert_eq!(money(1004).apply_rate(Decimal::new(10, 2)).unwrap(), money(100));
    }

    #[test]
    fn test_apply_negative_rate_fails() {
        assert_eq!(
            money(100).apply_rate(Decimal::new(-1, 1)),
            Err(MoneyError::NegativeRate)
        );
    }

    #[test]
    fn test_serde_rejects_negative() {
        assert!(serde_json::from_str::<Money>("-1").is_err());
        assert_eq!(serde_json::from_str::<Money>("3500").unwrap(), money(3500));
        assert_eq!(serde_json::to_string(&money(3500)).unwrap(), "3500");
    }

    #[test]
    fn test_currency_format() {
        assert_eq!(CurrencyCode::XOF.format(money(3500)), "3500 XOF");
        assert_eq!(CurrencyCode::EUR.format(money(3500)), "35.00 EUR");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("xof".parse::<CurrencyCode>().unwrap(), CurrencyCode::XOF);
        assert!("GBP".parse::<CurrencyCode>().is_err());
    }
}
