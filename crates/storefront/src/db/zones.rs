//! Shipping zone queries.

use sqlx::PgPool;
use tracing::instrument;

use nature_pharmacy_core::records::ShippingZoneRecord;
use nature_pharmacy_core::shipping::ShippingZone;

use super::RepositoryError;

/// Load every active zone, ordered by `(priority, id)`.
///
/// The ordering makes priority ties resolve to the oldest zone.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails and
/// `RepositoryError::DataCorruption` if a row is not a valid zone.
#[instrument(skip(pool))]
pub async fn list_active(pool: &PgPool) -> Result<Vec<ShippingZone>, RepositoryError> {
    let rows = sqlx::query_as::<_, ShippingZoneRecord>(
        r"
        SELECT
            id,
            name,
            countries,
            regions,
            shipping_cost,
            free_shipping_threshold,
            delivery_days_min,
            delivery_days_max,
            is_active,
            priority
        FROM pharmacy.shipping_zone
        WHERE is_active
        ORDER BY priority, id
        ",
    )
    .fetch_all(pool)
    .await?;

    let zones = rows
        .into_iter()
        .map(ShippingZone::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(zones)
}
