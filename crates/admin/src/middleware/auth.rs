//! Bearer-token authentication for the admin API.
//!
//! Every `/api/*` handler takes [`RequireApiToken`]; requests without a
//! matching `Authorization: Bearer <token>` header are rejected with 401.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;

use crate::error::ErrorBody;
use crate::state::AppState;

/// Extractor that requires a valid admin API token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_auth: RequireApiToken) -> impl IntoResponse {
///     "ok"
/// }
/// ```
pub struct RequireApiToken;

/// Error returned when the API token is missing or wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenRejection {
    /// No bearer token in the request.
    Missing,
    /// A bearer token that does not match.
    Invalid,
}

impl IntoResponse for ApiTokenRejection {
    fn into_response(self) -> Response {
        let error = match self {
            Self::Missing => "missing bearer token",
            Self::Invalid => "invalid bearer token",
        };
        (
            StatusCode::UNAUTHORIZED,
            [("www-authenticate", "Bearer")],
            Json(ErrorBody {
                error: error.to_string(),
            }),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireApiToken {
    type Rejection = ApiTokenRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = bearer_token(&parts.headers).ok_or(ApiTokenRejection::Missing)?;

        if !constant_time_compare(presented, state.api_token().expose_secret()) {
            tracing::warn!(path = %parts.uri.path(), "Rejected admin API token");
            return Err(ApiTokenRejection::Invalid);
        }

        Ok(Self)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Compare two strings without short-circuiting on the first differing byte.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
