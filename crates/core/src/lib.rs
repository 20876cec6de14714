//! Nature Pharmacy Core - domain types and pricing logic.
//!
//! This crate is shared by every Nature Pharmacy component:
//! - `storefront` - public JSON API for shipping quotes and checkout summaries
//! - `admin` - back-office API for shipping zones and coupons
//! - `cli` - migrations, zone file tooling and offline quotes
//!
//! # Architecture
//!
//! The core crate does no I/O: no HTTP, no database connections. Shipping
//! resolution and checkout pricing are pure functions over values the caller
//! owns. With the `postgres` feature it also provides the row types used by
//! the services and their conversions into domain types.
//!
//! # Modules
//!
//! - [`types`] - IDs, money, country codes and localized text
//! - [`shipping`] - zone matching and shipping fee computation
//! - [`checkout`] - coupons and order totals
//! - `records` - database rows (`postgres` feature)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
#[cfg(feature = "postgres")]
pub mod records;
pub mod shipping;
pub mod types;

pub use types::*;
