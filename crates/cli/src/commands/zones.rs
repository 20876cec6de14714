//! Zone file commands.
//!
//! A zone file is YAML (or JSON) with a top-level `zones` list of zone
//! drafts in the admin API's camelCase shape:
//!
//! ```yaml
//! zones:
//!   - name: { fr: Dakar, en: Dakar, es: Dakar }
//!     countries: [SN]
//!     regions: [Dakar]
//!     shippingCost: 1000
//!     estimatedDeliveryDays: { min: 1, max: 1 }
//!     priority: 2
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Check a file without touching the database
//! npharm zones validate zones.yaml
//!
//! # Insert every zone of a file
//! npharm zones import zones.yaml
//! ```

use std::path::Path;

use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use nature_pharmacy_admin::db::{RepositoryError, ZoneRepository};
use nature_pharmacy_core::{Locale, ZoneId};
use nature_pharmacy_core::shipping::{ShippingZone, ZoneDraft, ZoneError};

use super::{DatabaseUrlError, database_url};

/// Errors that can occur while reading or importing a zone file.
#[derive(Debug, Error)]
pub enum ZoneFileError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Zone #{index} ({name}) is invalid: {source}")]
    Invalid {
        index: usize,
        name: String,
        source: ZoneError,
    },

    #[error("Zone file contains no zones")]
    Empty,

    #[error(transparent)]
    Config(#[from] DatabaseUrlError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Import failed: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Deserialize)]
struct ZoneFile {
    zones: Vec<ZoneDraft>,
}

/// Read and validate every draft of a zone file.
///
/// Drafts come back trimmed, in file order.
///
/// # Errors
///
/// Returns `ZoneFileError` if the file cannot be read or parsed, is empty,
/// or any draft breaks a zone invariant.
pub fn load(path: &Path) -> Result<Vec<ZoneDraft>, ZoneFileError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| ZoneFileError::Io {
        path: display.clone(),
        source,
    })?;
    parse(&contents).map_err(|e| match e {
        ZoneFileError::Parse { source, .. } => ZoneFileError::Parse {
            path: display,
            source,
        },
        other => other,
    })
}

/// Parse and validate zone drafts from YAML text.
///
/// # Errors
///
/// See [`load`].
pub fn parse(contents: &str) -> Result<Vec<ZoneDraft>, ZoneFileError> {
    let file: ZoneFile =
        serde_yaml::from_str(contents).map_err(|source| ZoneFileError::Parse {
            path: "<input>".to_string(),
            source,
        })?;

    if file.zones.is_empty() {
        return Err(ZoneFileError::Empty);
    }

    file.zones
        .into_iter()
        .enumerate()
        .map(|(i, draft)| {
            let name = draft.name.get(Locale::En).to_owned();
            draft.validated().map_err(|source| ZoneFileError::Invalid {
                index: i + 1,
                name,
                source,
            })
        })
        .collect()
}

/// Turn drafts into zones with file-order IDs `1..=n`, for offline use.
#[must_use]
pub fn into_zones(drafts: Vec<ZoneDraft>) -> Vec<ShippingZone> {
    (1_i32..)
        .zip(drafts)
        .map(|(id, draft)| ShippingZone::from_draft(ZoneId::new(id), draft))
        .collect()
}

/// `npharm zones validate <file>`
///
/// # Errors
///
/// See [`load`].
pub fn validate(path: &Path) -> Result<(), ZoneFileError> {
    let drafts = load(path)?;

    for draft in &drafts {
        tracing::info!(
            name = draft.name.get(Locale::En),
            countries = draft.countries.len(),
            regions = draft.regions.len(),
            priority = draft.priority,
            active = draft.is_active,
            "ok"
        );
    }
    tracing::info!(count = drafts.len(), "Zone file is valid");
    Ok(())
}

/// `npharm zones import <file>`
///
/// The whole file is validated before the first insert, and every zone is
/// inserted in one transaction: a failed import leaves nothing behind.
///
/// # Errors
///
/// Returns `ZoneFileError` if the file is invalid or an insert fails.
pub async fn import(path: &Path) -> Result<(), ZoneFileError> {
    let drafts = load(path)?;
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;
    let zones = ZoneRepository::new(&pool).create_all(&drafts).await?;

    for zone in &zones {
        tracing::info!(zone_id = %zone.id, name = zone.name.get(Locale::En), "Imported zone");
    }

    tracing::info!(count = zones.len(), "Zone import complete");
    Ok(())
}
