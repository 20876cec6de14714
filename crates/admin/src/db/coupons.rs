//! Coupon repository.

use sqlx::PgPool;
use tracing::instrument;

use nature_pharmacy_core::CouponId;
use nature_pharmacy_core::checkout::{Coupon, CouponDraft};
use nature_pharmacy_core::records::{CouponRecord, discount_columns};

use super::RepositoryError;

/// Repository for coupon database operations.
pub struct CouponRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CouponRepository<'a> {
    /// Create a new coupon repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all coupons, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is not a valid coupon.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Coupon>, RepositoryError> {
        let rows = sqlx::query_as::<_, CouponRecord>(
            r"
            SELECT id, code, discount_kind, discount_value, minimum_order_amount,
                   starts_at, expires_at, usage_limit, used_count, is_active
            FROM pharmacy.coupon
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(Coupon::try_from)
            .collect::<Result<_, _>>()?)
    }

    /// Insert a new coupon from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the code is already taken.
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft), fields(code = %draft.code))]
    pub async fn create(&self, draft: &CouponDraft) -> Result<Coupon, RepositoryError> {
        let (kind, value) = discount_columns(draft.discount);
        let usage_limit = draft
            .usage_limit
            .map(|limit| i32::try_from(limit).unwrap_or(i32::MAX));

        let row = sqlx::query_as::<_, CouponRecord>(
            r"
            INSERT INTO pharmacy.coupon (
                code, discount_kind, discount_value, minimum_order_amount,
                starts_at, expires_at, usage_limit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, code, discount_kind, discount_value, minimum_order_amount,
                      starts_at, expires_at, usage_limit, used_count, is_active
            ",
        )
        .bind(draft.code.as_str())
        .bind(kind)
        .bind(value)
        .bind(draft.minimum_order_amount)
        .bind(draft.starts_at)
        .bind(draft.expires_at)
        .bind(usage_limit)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "coupon code {} already exists",
                    draft.code
                ));
            }
            RepositoryError::Database(e)
        })?;

        Ok(Coupon::try_from(row)?)
    }

    /// Switch a coupon off. Deactivated coupons are kept for order history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no coupon has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self), fields(coupon_id = %id))]
    pub async fn deactivate(&self, id: CouponId) -> Result<Coupon, RepositoryError> {
        let row = sqlx::query_as::<_, CouponRecord>(
            r"
            UPDATE pharmacy.coupon
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, discount_kind, discount_value, minimum_order_amount,
                      starts_at, expires_at, usage_limit, used_count, is_active
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Coupon::try_from(row)?)
    }
}
