//! HTTP middleware for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Auth guard (`RequireApiToken` extractor on `/api/*` handlers)

pub mod auth;

pub use auth::{ApiTokenRejection, RequireApiToken};
