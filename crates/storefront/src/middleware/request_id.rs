//! Correlates storefront requests with their logs and Sentry events.
//!
//! A checkout page usually sits behind a CDN or load balancer that already
//! stamps `x-request-id`. That value is kept when it is printable and of sane
//! length; otherwise the storefront mints a UUID v4.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID we echo back.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// Tags the request span, the Sentry scope and the response with an ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(upstream_id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// An upstream ID worth keeping: trimmed, non-empty, visible ASCII only.
fn upstream_id(header: &HeaderValue) -> Option<String> {
    let id = header.to_str().ok()?.trim();
    let usable = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| id.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    #[test]
    fn test_keeps_proxy_id() {
        assert_eq!(
            upstream_id(&header("cf-8a1b2c3d")).as_deref(),
            Some("cf-8a1b2c3d")
        );
        assert_eq!(upstream_id(&header("  abc  ")).as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_or_blank_id_is_replaced() {
        assert_eq!(upstream_id(&header("")), None);
        assert_eq!(upstream_id(&header("   ")), None);
    }

    #[test]
    fn test_oversized_or_spaced_id_is_replaced() {
        assert_eq!(upstream_id(&header(&"a".repeat(MAX_UPSTREAM_ID_LEN + 1))), None);
        assert!(upstream_id(&header(&"a".repeat(MAX_UPSTREAM_ID_LEN))).is_some());
        assert_eq!(upstream_id(&header("two words")), None);
    }
}
