//! Home page slider repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vitrine_core::SliderId;

use super::RepositoryError;
use crate::models::{NewSlider, Slider};

const SLIDER_COLUMNS: &str = "id, image, title, description, display_order, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct SliderRow {
    id: i32,
    image: String,
    title: String,
    description: String,
    display_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SliderRow> for Slider {
    type Error = RepositoryError;

    fn try_from(row: SliderRow) -> Result<Self, Self::Error> {
        let order = u32::try_from(row.display_order).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative order for slider {}", row.id))
        })?;

        Ok(Self {
            id: SliderId::new(row.id),
            image: row.image,
            title: row.title,
            description: row.description,
            order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for slider database operations.
pub struct SliderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SliderRepository<'a> {
    /// Create a new slider repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every slide by display order, then ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Slider>, RepositoryError> {
        let rows = sqlx::query_as::<_, SliderRow>(&format!(
            "SELECT {SLIDER_COLUMNS} FROM slider ORDER BY display_order, id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Slider::try_from).collect()
    }

    /// Add a slide.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, including an
    /// order that does not fit the column.
    pub async fn create(&self, slider: &NewSlider) -> Result<Slider, RepositoryError> {
        let order = i32::try_from(slider.order)
            .map_err(|_| RepositoryError::Conflict("slide order out of range".to_owned()))?;

        let row = sqlx::query_as::<_, SliderRow>(&format!(
            "INSERT INTO slider (image, title, description, display_order) \
             VALUES ($1, $2, $3, $4) RETURNING {SLIDER_COLUMNS}"
        ))
        .bind(&slider.image)
        .bind(&slider.title)
        .bind(&slider.description)
        .bind(order)
        .fetch_one(self.pool)
        .await?;

        Slider::try_from(row)
    }
}
