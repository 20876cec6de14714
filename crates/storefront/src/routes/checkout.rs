//! Checkout summary endpoint.
//!
//! Prices a cart for a destination without placing an order: subtotal,
//! coupon discount, shipping and tax. Coupon usage is not consumed here.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use nature_pharmacy_core::CountryCode;
use nature_pharmacy_core::checkout::{
    self, CartLine, CouponCode, CouponError, Destination, PricedOrder,
};
use nature_pharmacy_core::shipping::{QuoteStatus, ShippingError};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Body of `POST /api/checkout/summary`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// A priced order with its shipping classification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub order: PricedOrder,
    pub shipping_status: QuoteStatus,
}

/// `POST /api/checkout/summary`
///
/// # Errors
///
/// Returns 400 for invalid input or a rejected coupon and 422 when no
/// shipping zone serves the destination.
#[instrument(skip(state, request), fields(country = %request.country, lines = request.lines.len()))]
pub async fn summary(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SummaryRequest>,
) -> Result<Json<SummaryResponse>> {
    let destination = Destination {
        country: CountryCode::parse(&request.country).map_err(ShippingError::from)?,
        region: request.region,
    };

    let coupon = match request.coupon_code.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => {
            let code = CouponCode::parse(raw)?;
            let coupon = state
                .catalog()
                .coupon(&code)
                .await?
                .ok_or(CouponError::NotFound)?;
            Some(coupon)
        }
    };

    let zones = state.catalog().zones().await?;
    let order = checkout::price_order(
        &request.lines,
        coupon.as_ref(),
        &destination,
        &zones,
        &state.checkout_context(),
        Utc::now(),
    )?;

    tracing::debug!(total = %order.totals.total, "Priced checkout summary");

    Ok(Json(SummaryResponse {
        shipping_status: order.quote.status(),
        order,
    }))
}
