//! Shipping zone repository.

use sqlx::{PgExecutor, PgPool};
use sqlx::types::Json;
use tracing::instrument;

use nature_pharmacy_core::ZoneId;
use nature_pharmacy_core::records::ShippingZoneRecord;
use nature_pharmacy_core::shipping::{ShippingZone, ZoneDraft};

use super::RepositoryError;

/// Repository for shipping zone database operations.
pub struct ZoneRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ZoneRepository<'a> {
    /// Create a new zone repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every zone, active or not, in evaluation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a row is not a valid zone.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ShippingZone>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShippingZoneRecord>(
            r"
            SELECT id, name, countries, regions, shipping_cost, free_shipping_threshold,
                   delivery_days_min, delivery_days_max, is_active, priority
            FROM pharmacy.shipping_zone
            ORDER BY priority, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(ShippingZone::try_from)
            .collect::<Result<_, _>>()?)
    }

    /// Get a zone by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is not a valid zone.
    #[instrument(skip(self), fields(zone_id = %id))]
    pub async fn get(&self, id: ZoneId) -> Result<Option<ShippingZone>, RepositoryError> {
        let row = sqlx::query_as::<_, ShippingZoneRecord>(
            r"
            SELECT id, name, countries, regions, shipping_cost, free_shipping_threshold,
                   delivery_days_min, delivery_days_max, is_active, priority
            FROM pharmacy.shipping_zone
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ShippingZone::try_from).transpose()?)
    }

    /// Insert a validated draft.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft))]
    pub async fn create(&self, draft: &ZoneDraft) -> Result<ShippingZone, RepositoryError> {
        insert(self.pool, draft).await
    }

    /// Insert several validated drafts in one transaction, in order.
    ///
    /// Nothing is inserted if any insert fails.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if an insert fails.
    #[instrument(skip(self, drafts), fields(count = drafts.len()))]
    pub async fn create_all(
        &self,
        drafts: &[ZoneDraft],
    ) -> Result<Vec<ShippingZone>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut zones = Vec::with_capacity(drafts.len());
        for draft in drafts {
            zones.push(insert(&mut *tx, draft).await?);
        }
        tx.commit().await?;
        Ok(zones)
    }

    /// Replace every field of an existing zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no zone has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, draft), fields(zone_id = %id))]
    pub async fn update(
        &self,
        id: ZoneId,
        draft: &ZoneDraft,
    ) -> Result<ShippingZone, RepositoryError> {
        let columns = ZoneColumns::from(draft);
        let row = sqlx::query_as::<_, ShippingZoneRecord>(
            r"
            UPDATE pharmacy.shipping_zone
            SET name = $2,
                countries = $3,
                regions = $4,
                shipping_cost = $5,
                free_shipping_threshold = $6,
                delivery_days_min = $7,
                delivery_days_max = $8,
                is_active = $9,
                priority = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, countries, regions, shipping_cost, free_shipping_threshold,
                      delivery_days_min, delivery_days_max, is_active, priority
            ",
        )
        .bind(id)
        .bind(Json(&draft.name))
        .bind(&columns.countries)
        .bind(&draft.regions)
        .bind(draft.shipping_cost)
        .bind(draft.free_shipping_threshold)
        .bind(columns.delivery_days_min)
        .bind(columns.delivery_days_max)
        .bind(draft.is_active)
        .bind(draft.priority)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(ShippingZone::try_from(row)?)
    }

    /// Delete a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no zone has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self), fields(zone_id = %id))]
    pub async fn delete(&self, id: ZoneId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM pharmacy.shipping_zone WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Assign priorities `1..=n` following the order of `ids`.
    ///
    /// Zones missing from `ids` are renumbered `n+1..` in their current
    /// `(priority, id)` order, so no unlisted zone ties with a listed one.
    /// Runs in one transaction: either every zone is renumbered or none is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if any ID does not exist.
    /// Returns `RepositoryError::Database` if an update fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn reorder(&self, ids: &[ZoneId]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for (priority, id) in (1_i32..).zip(ids) {
            let result = sqlx::query(
                r"
                UPDATE pharmacy.shipping_zone
                SET priority = $2, updated_at = NOW()
                WHERE id = $1
                ",
            )
            .bind(*id)
            .bind(priority)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
        }

        let listed: Vec<i32> = ids.iter().map(ZoneId::as_i32).collect();
        let offset = i32::try_from(listed.len()).unwrap_or(i32::MAX);
        sqlx::query(
            r"
            UPDATE pharmacy.shipping_zone AS z
            SET priority = ($2 + ranked.position)::INT, updated_at = NOW()
            FROM (
                SELECT id, ROW_NUMBER() OVER (ORDER BY priority, id) AS position
                FROM pharmacy.shipping_zone
                WHERE id <> ALL($1)
            ) AS ranked
            WHERE z.id = ranked.id
            ",
        )
        .bind(&listed)
        .bind(offset)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn insert<'e, E>(executor: E, draft: &ZoneDraft) -> Result<ShippingZone, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let columns = ZoneColumns::from(draft);
    let row = sqlx::query_as::<_, ShippingZoneRecord>(
        r"
        INSERT INTO pharmacy.shipping_zone (
            name, countries, regions, shipping_cost, free_shipping_threshold,
            delivery_days_min, delivery_days_max, is_active, priority
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, name, countries, regions, shipping_cost, free_shipping_threshold,
                  delivery_days_min, delivery_days_max, is_active, priority
        ",
    )
    .bind(Json(&draft.name))
    .bind(&columns.countries)
    .bind(&draft.regions)
    .bind(draft.shipping_cost)
    .bind(draft.free_shipping_threshold)
    .bind(columns.delivery_days_min)
    .bind(columns.delivery_days_max)
    .bind(draft.is_active)
    .bind(draft.priority)
    .fetch_one(executor)
    .await?;

    Ok(ShippingZone::try_from(row)?)
}

/// Draft fields that need converting to their column types.
struct ZoneColumns {
    countries: Vec<String>,
    delivery_days_min: i16,
    delivery_days_max: i16,
}

impl From<&ZoneDraft> for ZoneColumns {
    fn from(draft: &ZoneDraft) -> Self {
        // Validated drafts keep delivery days within MAX_DELIVERY_DAYS, far below i16::MAX.
        let days = |d: u16| i16::try_from(d).unwrap_or(i16::MAX);
        Self {
            countries: draft
                .countries
                .iter()
                .map(|c| c.as_str().to_owned())
                .collect(),
            delivery_days_min: days(draft.estimated_delivery_days.min),
            delivery_days_max: days(draft.estimated_delivery_days.max),
        }
    }
}
