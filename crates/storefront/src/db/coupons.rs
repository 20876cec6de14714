//! Coupon lookups.

use sqlx::PgPool;
use tracing::instrument;

use nature_pharmacy_core::checkout::{Coupon, CouponCode};
use nature_pharmacy_core::records::CouponRecord;

use super::RepositoryError;

/// Find a coupon by its normalized code.
///
/// Inactive coupons are returned too; the caller decides how to reject them.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails and
/// `RepositoryError::DataCorruption` if the row is not a valid coupon.
#[instrument(skip(pool), fields(code = %code))]
pub async fn get_by_code(pool: &PgPool, code: &CouponCode) -> Result<Option<Coupon>, RepositoryError> {
    let row = sqlx::query_as::<_, CouponRecord>(
        r"
        SELECT
            id,
            code,
            discount_kind,
            discount_value,
            minimum_order_amount,
            starts_at,
            expires_at,
            usage_limit,
            used_count,
            is_active
        FROM pharmacy.coupon
        WHERE code = $1
        ",
    )
    .bind(code.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Coupon::try_from).transpose()?)
}
