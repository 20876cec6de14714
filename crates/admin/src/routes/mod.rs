//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                           - Liveness probe
//! GET    /health/ready                     - Readiness probe (database)
//!
//! # Shipping zones (bearer token)
//! GET    /api/shipping-zones               - All zones in evaluation order
//! POST   /api/shipping-zones               - Create a zone
//! POST   /api/shipping-zones/reorder       - Renumber priorities from a list of IDs
//! GET    /api/shipping-zones/{id}          - Zone detail
//! PUT    /api/shipping-zones/{id}          - Replace a zone
//! DELETE /api/shipping-zones/{id}          - Delete a zone
//!
//! # Coupons (bearer token)
//! GET    /api/coupons                      - All coupons, newest first
//! POST   /api/coupons                      - Create a coupon
//! POST   /api/coupons/{id}/deactivate      - Switch a coupon off
//! ```

pub mod coupons;
pub mod health;
pub mod zones;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the authenticated management API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shipping-zones", get(zones::list).post(zones::create))
        .route("/shipping-zones/reorder", post(zones::reorder))
        .route(
            "/shipping-zones/{id}",
            get(zones::show).put(zones::update).delete(zones::delete),
        )
        .route("/coupons", get(coupons::list).post(coupons::create))
        .route("/coupons/{id}/deactivate", post(coupons::deactivate))
}

/// Create the health probe router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
