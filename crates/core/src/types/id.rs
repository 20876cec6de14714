//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing a zone ID with a coupon ID.

/// Define an ID newtype over a Postgres `SERIAL` (`i32`).
///
/// The type is ordered, hashable and serializes as a bare number. With the
/// `postgres` feature it also binds and decodes as `INT4`.
///
/// # Example
///
/// ```rust
/// # use nature_pharmacy_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(ParcelId);
///
/// let warehouse = WarehouseId::new(1);
/// let parcel = ParcelId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = parcel;
/// # let _ = (warehouse, parcel);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a database ID.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// The raw database ID.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id!(ZoneId);
define_id!(CouponId);
define_id!(ProductId);
