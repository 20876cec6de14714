//! Shipping zone management endpoints.
//!
//! Every write runs the draft through [`ZoneDraft::validated`] first, so
//! configuration errors never reach the database.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use nature_pharmacy_core::ZoneId;
use nature_pharmacy_core::shipping::{ShippingZone, ZoneDraft};

use crate::db::{RepositoryError, ZoneRepository};
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::middleware::RequireApiToken;
use crate::state::AppState;

/// Body of `POST /api/shipping-zones/reorder`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Zone IDs in their new evaluation order; the first gets priority 1.
    pub ids: Vec<ZoneId>,
}

/// `GET /api/shipping-zones`
#[instrument(skip(state, _auth))]
pub async fn list(
    _auth: RequireApiToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<ShippingZone>>> {
    let zones = ZoneRepository::new(state.pool()).list().await?;
    Ok(Json(zones))
}

/// `GET /api/shipping-zones/{id}`
#[instrument(skip(state, _auth), fields(zone_id = %id))]
pub async fn show(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    Path(id): Path<ZoneId>,
) -> Result<Json<ShippingZone>> {
    ZoneRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("shipping zone {id}")))
}

/// `POST /api/shipping-zones`
#[instrument(skip(state, _auth, draft))]
pub async fn create(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ZoneDraft>,
) -> Result<(StatusCode, Json<ShippingZone>)> {
    let draft = draft.validated()?;
    let zone = ZoneRepository::new(state.pool()).create(&draft).await?;

    tracing::info!(zone_id = %zone.id, priority = zone.priority, "Created shipping zone");
    Ok((StatusCode::CREATED, Json(zone)))
}

/// `PUT /api/shipping-zones/{id}`
#[instrument(skip(state, _auth, draft), fields(zone_id = %id))]
pub async fn update(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    Path(id): Path<ZoneId>,
    ApiJson(draft): ApiJson<ZoneDraft>,
) -> Result<Json<ShippingZone>> {
    let draft = draft.validated()?;
    let zone = ZoneRepository::new(state.pool())
        .update(id, &draft)
        .await
        .map_err(|e| not_found_as(e, id))?;

    tracing::info!("Updated shipping zone");
    Ok(Json(zone))
}

/// `DELETE /api/shipping-zones/{id}`
#[instrument(skip(state, _auth), fields(zone_id = %id))]
pub async fn delete(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    Path(id): Path<ZoneId>,
) -> Result<StatusCode> {
    ZoneRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| not_found_as(e, id))?;

    tracing::info!("Deleted shipping zone");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/shipping-zones/reorder`
///
/// Listed zones take priorities `1..=n`; unlisted zones follow in their
/// previous order. Returns the full zone list in its new order.
#[instrument(skip(state, _auth, request), fields(count = request.ids.len()))]
pub async fn reorder(
    _auth: RequireApiToken,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReorderRequest>,
) -> Result<Json<Vec<ShippingZone>>> {
    check_unique(&request.ids)?;

    let repo = ZoneRepository::new(state.pool());
    repo.reorder(&request.ids).await?;

    tracing::info!("Reordered shipping zones");
    Ok(Json(repo.list().await?))
}

/// Reject reorder lists that are empty or name a zone twice.
fn check_unique(ids: &[ZoneId]) -> Result<()> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("ids cannot be empty".to_string()));
    }
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    if let Some(dup) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(AppError::BadRequest(format!(
            "zone {dup} is listed more than once"
        )));
    }
    Ok(())
}

fn not_found_as(err: RepositoryError, id: ZoneId) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound(format!("shipping zone {id}")),
        other => other.into(),
    }
}
