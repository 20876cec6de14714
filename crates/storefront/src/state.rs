//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use nature_pharmacy_core::checkout::CheckoutContext;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: Catalog,
}

impl AppState {
    /// Create application state backed by the database.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let catalog = Catalog::postgres(pool.clone(), config.zone_cache_ttl);
        Self::with_catalog(config, pool, catalog)
    }

    /// Create application state with an explicit catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, pool: PgPool, catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the zone and coupon catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Store-wide pricing settings.
    #[must_use]
    pub fn checkout_context(&self) -> CheckoutContext {
        self.inner.config.checkout_context()
    }
}
