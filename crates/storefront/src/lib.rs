//! Nature Pharmacy Storefront library.
//!
//! This crate provides the storefront API as a library, allowing the router
//! to be tested in-process and reused by the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, extract::Request, middleware::from_fn};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront router with its middleware stack.
///
/// `rate_limit` enables per-IP limiting on `/api/*`; it needs a client IP
/// header on every request, so in-process tests turn it off.
pub fn app(state: AppState, rate_limit: bool) -> Router {
    let mut api = routes::api_routes();
    if rate_limit {
        api = api.layer(middleware::api_rate_limiter());
    }

    Router::new()
        .merge(routes::health_routes())
        .nest("/api", api)
        .with_state(state)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
