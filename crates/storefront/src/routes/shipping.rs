//! Shipping quote endpoint.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use nature_pharmacy_core::CurrencyCode;
use nature_pharmacy_core::shipping::{self, QuoteStatus, ShippingQuote, ShippingRequest};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::state::AppState;

/// A shipping quote with its classification.
///
/// `status` tells a free quote (`free_threshold`) apart from a destination
/// nobody ships to (`unserviceable`); both carry a zero `shippingCost`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: ShippingQuote,
    pub status: QuoteStatus,
    pub currency: CurrencyCode,
}

/// `POST /api/shipping/quote`
///
/// # Errors
///
/// Returns 400 for a malformed country or a negative order total.
#[instrument(skip(state, request), fields(country = %request.country))]
pub async fn quote(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ShippingRequest>,
) -> Result<Json<QuoteResponse>> {
    let zones = state.catalog().zones().await?;
    let quote = shipping::resolve_request(&request, &zones)?;
    let status = quote.status();

    if status == QuoteStatus::Unserviceable {
        tracing::info!(region = ?request.region, "No shipping zone serves destination");
    }

    Ok(Json(QuoteResponse {
        quote,
        status,
        currency: state.config().currency,
    }))
}
