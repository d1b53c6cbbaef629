//! Category repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vitrine_core::{BoutiqueId, CategoryId};

use super::{RepositoryError, write_error};
use crate::models::{Category, CategoryDraft};

const CATEGORY_COLUMNS: &str = "id, name, description, boutique_id, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: String,
    boutique_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            boutique_id: BoutiqueId::new(row.boutique_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the categories of a boutique.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_boutique(
        &self,
        boutique_id: BoutiqueId,
    ) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE boutique_id = $1 ORDER BY id"
        ))
        .bind(boutique_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM category WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a category in a boutique.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the boutique no longer exists.
    pub async fn create(
        &self,
        boutique_id: BoutiqueId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO category (name, description, boutique_id) \
             VALUES ($1, $2, $3) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(boutique_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| write_error(e, "boutique does not exist"))?;

        Ok(row.into())
    }

    /// Overwrite a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn update(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE category SET name = $2, description = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Its product links go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Of the given IDs, those that are categories of the boutique.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn ids_in_boutique(
        &self,
        boutique_id: BoutiqueId,
        ids: &[CategoryId],
    ) -> Result<Vec<CategoryId>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found = sqlx::query_scalar::<_, CategoryId>(
            "SELECT id FROM category WHERE boutique_id = $1 AND id = ANY($2) ORDER BY id",
        )
        .bind(boutique_id)
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(found)
    }
}
