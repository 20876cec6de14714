//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness probe
//! GET  /health/ready           - Readiness probe (database)
//!
//! # API (rate limited)
//! POST /api/shipping/quote     - Shipping quote for a destination and order total
//! POST /api/checkout/summary   - Priced cart: subtotal, discount, shipping, tax
//! ```

pub mod checkout;
pub mod health;
pub mod shipping;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shipping/quote", post(shipping::quote))
        .route("/checkout/summary", post(checkout::summary))
}

/// Create the health probe router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
