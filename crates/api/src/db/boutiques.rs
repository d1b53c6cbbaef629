//! Boutique repository.

use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use vitrine_core::{BoutiqueId, VendorId};

use super::{RepositoryError, write_error};
use crate::models::{Boutique, NewBoutique};

const BOUTIQUE_COLUMNS: &str = "id, name, image, description, owner_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct BoutiqueRow {
    id: i32,
    name: String,
    image: Option<String>,
    description: String,
    owner_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BoutiqueRow> for Boutique {
    fn from(row: BoutiqueRow) -> Self {
        Self {
            id: BoutiqueId::new(row.id),
            name: row.name,
            image: row.image.filter(|i| !i.is_empty()),
            description: row.description,
            owner_id: row.owner_id.map(VendorId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert a boutique on any executor, so vendor creation can run it inside
/// its transaction.
pub(crate) async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    owner: Option<VendorId>,
    boutique: &NewBoutique,
) -> Result<Boutique, RepositoryError> {
    let row = sqlx::query_as::<_, BoutiqueRow>(&format!(
        "INSERT INTO boutique (name, description, image, owner_id) \
         VALUES ($1, $2, $3, $4) RETURNING {BOUTIQUE_COLUMNS}"
    ))
    .bind(&boutique.name)
    .bind(&boutique.description)
    .bind(boutique.image.as_deref())
    .bind(owner)
    .fetch_one(executor)
    .await
    .map_err(|e| write_error(e, "vendor already owns a boutique"))?;

    Ok(row.into())
}

/// Repository for boutique database operations.
pub struct BoutiqueRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BoutiqueRepository<'a> {
    /// Create a new boutique repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every boutique, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Boutique>, RepositoryError> {
        let rows = sqlx::query_as::<_, BoutiqueRow>(&format!(
            "SELECT {BOUTIQUE_COLUMNS} FROM boutique ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a boutique by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: BoutiqueId) -> Result<Option<Boutique>, RepositoryError> {
        let row = sqlx::query_as::<_, BoutiqueRow>(&format!(
            "SELECT {BOUTIQUE_COLUMNS} FROM boutique WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
