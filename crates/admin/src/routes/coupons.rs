//! Coupon management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use nature_pharmacy_core::CouponId;
use nature_pharmacy_core::checkout::{Coupon, CouponDraft};

use crate::db::{CouponRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::middleware::RequireApiToken;
use crate::state::AppState;

/// `GET /api/coupons`
#[instrument(skip(state, _auth))]
pub async fn list(
    _auth: RequireApiToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<Coupon>>> {
    let coupons = CouponRepository::new(state.pool()).list().await?;
    Ok(Json(coupons))
}

/// `POST /api/coupons`
///
/// Codes are normalized to upper case on deserialization; a code that is
/// already taken returns 409.
#[instrument(skip(state, _auth, draft), fields(code = %draft.code))]
pub async fn create(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<CouponDraft>,
) -> Result<(StatusCode, Json<Coupon>)> {
    draft.validate()?;
    let coupon = CouponRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(coupon_id = %coupon.id, "Created coupon");
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// `POST /api/coupons/{id}/deactivate`
#[instrument(skip(state, _auth), fields(coupon_id = %id))]
pub async fn deactivate(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    Path(id): Path<CouponId>,
) -> Result<Json<Coupon>> {
    let coupon = CouponRepository::new(state.pool())
        .deactivate(id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("coupon {id}")),
            other => other.into(),
        })?;

    tracing::info!("Deactivated coupon");
    Ok(Json(coupon))
}
