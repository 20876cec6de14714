//! Coupon codes and discount rules.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CouponId, Money, MoneyError};

/// Basis points in 100%.
const FULL_PERCENTAGE_BPS: u32 = 10_000;

/// Errors in a coupon's configuration, raised when it is created.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CouponConfigError {
    /// The code is empty.
    #[error("coupon code cannot be empty")]
    EmptyCode,
    /// The code length is out of range.
    #[error("coupon code must be {min}-{max} characters")]
    CodeLength {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
    },
    /// The code contains something other than letters, digits, `-` or `_`.
    #[error("coupon code may only contain letters, digits, '-' and '_'")]
    CodeCharacters,
    /// A percentage outside 0.01%..=100%.
    #[error("percentage must be between 1 and 10000 basis points (got {0})")]
    InvalidPercentage(u32),
    /// A fixed discount of zero.
    #[error("fixed discount must be greater than zero")]
    ZeroAmount,
    /// The validity window ends before it starts.
    #[error("coupon expires before it starts")]
    InvertedWindow,
}

/// Reasons a coupon cannot be applied to an order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CouponError {
    /// No coupon has this code.
    #[error("unknown coupon code")]
    NotFound,
    /// The coupon was switched off.
    #[error("coupon is not active")]
    Inactive,
    /// The validity window has not opened.
    #[error("coupon is not valid before {starts_at}")]
    NotYetValid {
        /// Start of validity.
        starts_at: DateTime<Utc>,
    },
    /// The validity window has closed.
    #[error("coupon expired at {expires_at}")]
    Expired {
        /// End of validity.
        expires_at: DateTime<Utc>,
    },
    /// Every allowed use has been consumed.
    #[error("coupon usage limit reached")]
    UsageLimitReached,
    /// The order is below the coupon's minimum.
    #[error("order subtotal is below the coupon minimum of {minimum}")]
    MinimumNotMet {
        /// Minimum subtotal in minor units.
        minimum: Money,
    },
    /// The discount could not be computed.
    #[error("discount computation failed: {0}")]
    Amount(#[from] MoneyError),
}

/// A normalized coupon code (upper case, `[A-Z0-9_-]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Minimum code length.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum code length.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a code, trimming and upper-casing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty, out of range, or contains
    /// characters other than ASCII letters, digits, `-` and `_`.
    pub fn parse(s: &str) -> Result<Self, CouponConfigError> {
        let code = s.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(CouponConfigError::EmptyCode);
        }
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&code.len()) {
            return Err(CouponConfigError::CodeLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }
        if !code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(CouponConfigError::CodeCharacters);
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

/// How much a coupon takes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// A share of the subtotal, in basis points (1500 = 15%).
    Percentage(u32),
    /// A fixed amount, capped at the subtotal.
    FixedAmount(Money),
}

impl Discount {
    fn validate(self) -> Result<(), CouponConfigError> {
        match self {
            Self::Percentage(bps) if bps == 0 || bps > FULL_PERCENTAGE_BPS => {
                Err(CouponConfigError::InvalidPercentage(bps))
            }
            Self::FixedAmount(amount) if amount.is_zero() => Err(CouponConfigError::ZeroAmount),
            _ => Ok(()),
        }
    }

    /// The discount for `subtotal`. Never exceeds `subtotal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the percentage computation overflows.
    pub fn amount_for(self, subtotal: Money) -> Result<Money, MoneyError> {
        match self {
            Self::Percentage(bps) => {
                let bps = bps.min(FULL_PERCENTAGE_BPS);
                subtotal.apply_rate(Decimal::new(i64::from(bps), 4))
            }
            Self::FixedAmount(amount) => Ok(amount.min(subtotal)),
        }
    }
}

/// Coupon fields as entered by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDraft {
    pub code: CouponCode,
    pub discount: Discount,
    #[serde(default)]
    pub minimum_order_amount: Option<Money>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
}

impl CouponDraft {
    /// Check the draft's configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found.
    pub fn validate(&self) -> Result<(), CouponConfigError> {
        self.discount.validate()?;
        if let (Some(start), Some(end)) = (self.starts_at, self.expires_at)
            && end <= start
        {
            return Err(CouponConfigError::InvertedWindow);
        }
        Ok(())
    }
}

/// A stored coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub code: CouponCode,
    pub discount: Discount,
    pub minimum_order_amount: Option<Money>,
    pub starts_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub is_active: bool,
}

impl Coupon {
    /// Compute the discount this coupon grants on `subtotal` at `now`.
    ///
    /// # Errors
    ///
    /// Returns the reason the coupon does not apply.
    pub fn apply(&self, subtotal: Money, now: DateTime<Utc>) -> Result<Money, CouponError> {
        if !self.is_active {
            return Err(CouponError::Inactive);
        }
        if let Some(starts_at) = self.starts_at
            && now < starts_at
        {
            return Err(CouponError::NotYetValid { starts_at });
        }
        if let Some(expires_at) = self.expires_at
            && now >= expires_at
        {
            return Err(CouponError::Expired { expires_at });
        }
        if self
            .usage_limit
            .is_some_and(|limit| self.used_count >= limit)
        {
            return Err(CouponError::UsageLimitReached);
        }
        if let Some(minimum) = self.minimum_order_amount
            && subtotal < minimum
        {
            return Err(CouponError::MinimumNotMet { minimum });
        }
        Ok(self.discount.amount_for(subtotal)?)
    }
}
