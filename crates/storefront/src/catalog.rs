//! Shipping zone and coupon source for request handlers.
//!
//! Zones are read far more often than they change, so the active set is
//! loaded once and cached with `moka` as an immutable snapshot. A request
//! resolves against a single snapshot, never a half-updated list. Admin edits
//! become visible once the snapshot's TTL expires.
//!
//! Coupons are not cached: their usage counters change with every order.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use nature_pharmacy_core::checkout::{Coupon, CouponCode};
use nature_pharmacy_core::shipping::ShippingZone;

use crate::db::{self, RepositoryError};

/// An immutable, shareable list of zones ordered by `(priority, id)`.
pub type ZoneSnapshot = Arc<[ShippingZone]>;

#[derive(Clone)]
enum Source {
    Database(PgPool),
    Static {
        zones: ZoneSnapshot,
        coupons: Arc<[Coupon]>,
    },
}

/// Where handlers get shipping zones and coupons from.
#[derive(Clone)]
pub struct Catalog {
    source: Source,
    zones: Cache<(), ZoneSnapshot>,
}

impl Catalog {
    /// A catalog backed by `PostgreSQL`, caching zones for `ttl`.
    #[must_use]
    pub fn postgres(pool: PgPool, ttl: Duration) -> Self {
        Self {
            source: Source::Database(pool),
            zones: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// A fixed in-memory catalog.
    #[must_use]
    pub fn fixed(zones: Vec<ShippingZone>, coupons: Vec<Coupon>) -> Self {
        Self {
            source: Source::Static {
                zones: zones.into(),
                coupons: coupons.into(),
            },
            zones: Cache::builder().max_capacity(1).build(),
        }
    }

    /// The current zone snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the zones cannot be loaded.
    #[instrument(skip(self))]
    pub async fn zones(&self) -> Result<ZoneSnapshot, RepositoryError> {
        match &self.source {
            Source::Static { zones, .. } => Ok(Arc::clone(zones)),
            Source::Database(pool) => {
                self.zones
                    .try_get_with((), async {
                        let zones = db::zones::list_active(pool).await?;
                        debug!(count = zones.len(), "Loaded shipping zone snapshot");
                        Ok::<_, RepositoryError>(ZoneSnapshot::from(zones))
                    })
                    .await
                    .map_err(unwrap_shared)
            }
        }
    }

    /// Look up a coupon by code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn coupon(&self, code: &CouponCode) -> Result<Option<Coupon>, RepositoryError> {
        match &self.source {
            Source::Static { coupons, .. } => {
                Ok(coupons.iter().find(|c| c.code == *code).cloned())
            }
            Source::Database(pool) => db::coupons::get_by_code(pool, code).await,
        }
    }
}

/// `try_get_with` shares one loader error between concurrent waiters.
fn unwrap_shared(err: Arc<RepositoryError>) -> RepositoryError {
    Arc::try_unwrap(err).unwrap_or_else(|shared| match shared.as_ref() {
        RepositoryError::Database(e) => {
            RepositoryError::Database(sqlx::Error::Protocol(e.to_string()))
        }
        RepositoryError::DataCorruption(e) => RepositoryError::DataCorruption(e.clone()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nature_pharmacy_core::checkout::Discount;
    use nature_pharmacy_core::shipping::DeliveryEstimate;
    use nature_pharmacy_core::{CountryCode, CouponId, LocalizedText, Money, ZoneId};

    use super::*;

    fn zone(id: i32) -> ShippingZone {
        ShippingZone {
            id: ZoneId::new(id),
            name: LocalizedText::new("Mali", "Mali", "Malí").unwrap(),
            countries: vec![CountryCode::parse("ML").unwrap()],
            regions: vec![],
            shipping_cost: Money::from_minor(4000).unwrap(),
            free_shipping_threshold: None,
            estimated_delivery_days: DeliveryEstimate { min: 4, max: 9 },
            is_active: true,
            priority: 1,
        }
    }

    #[tokio::test]
    async fn test_fixed_catalog_returns_zones() {
        let catalog = Catalog::fixed(vec![zone(1), zone(2)], vec![]);
        let zones = catalog.zones().await.unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id, ZoneId::new(1));
    }

    #[tokio::test]
    async fn test_fixed_catalog_coupon_lookup() {
        let coupon = Coupon {
            id: CouponId::new(1),
            code: CouponCode::parse("SAHEL5").unwrap(),
            discount: Discount::FixedAmount(Money::from_minor(500).unwrap()),
            minimum_order_amount: None,
            starts_at: None,
            expires_at: None,
            usage_limit: None,
            used_count: 0,
            is_active: true,
        };
        let catalog = Catalog::fixed(vec![], vec![coupon]);

        let found = catalog
            .coupon(&CouponCode::parse("sahel5").unwrap())
            .await
            .unwrap();
        assert_eq!(found.unwrap().id, CouponId::new(1));

        let missing = catalog
            .coupon(&CouponCode::parse("NOPE").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
