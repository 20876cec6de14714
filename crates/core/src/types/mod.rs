//! Core value types for Nature Pharmacy.
//!
//! This module provides type-safe wrappers for IDs, money, countries and
//! localized display strings.

pub mod country;
pub mod id;
pub mod locale;
pub mod money;

pub use country::{CountryCode, CountryCodeError};
pub use id::*;
pub use locale::{Locale, LocalizedText, LocalizedTextError};
pub use money::{CurrencyCode, Money, MoneyError};
