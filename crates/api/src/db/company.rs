//! Company profile repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vitrine_core::{CompanyProfileId, Email};

use super::RepositoryError;
use crate::models::{CompanyProfile, CompanyProfileDraft};

const COMPANY_COLUMNS: &str =
    "id, name, whatsapp_number, address, email, logo, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct CompanyProfileRow {
    id: i32,
    name: String,
    whatsapp_number: String,
    address: String,
    email: Option<String>,
    logo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CompanyProfileRow> for CompanyProfile {
    type Error = RepositoryError;

    fn try_from(row: CompanyProfileRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .filter(|e| !e.is_empty())
            .map(|e| Email::parse(&e))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: CompanyProfileId::new(row.id),
            name: row.name,
            whatsapp_number: row.whatsapp_number,
            address: row.address,
            email,
            logo: row.logo.filter(|l| !l.is_empty()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for the company profile.
pub struct CompanyProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompanyProfileRepository<'a> {
    /// Create a new company profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The profile served to clients: the first record by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first(&self) -> Result<Option<CompanyProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, CompanyProfileRow>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM company_profile ORDER BY id LIMIT 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        row.map(CompanyProfile::try_from).transpose()
    }

    /// Update the first profile, or create it when there is none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn save_first(
        &self,
        draft: &CompanyProfileDraft,
    ) -> Result<CompanyProfile, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, CompanyProfileId>(
            "SELECT id FROM company_profile ORDER BY id LIMIT 1 FOR UPDATE",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let email = draft.email.as_ref().map(Email::as_str);
        let row = match existing {
            Some(id) => {
                sqlx::query_as::<_, CompanyProfileRow>(&format!(
                    "UPDATE company_profile SET name = $2, whatsapp_number = $3, address = $4, \
                     email = $5, logo = COALESCE($6, logo), updated_at = NOW() \
                     WHERE id = $1 RETURNING {COMPANY_COLUMNS}"
                ))
                .bind(id)
                .bind(&draft.name)
                .bind(&draft.whatsapp_number)
                .bind(&draft.address)
                .bind(email)
                .bind(draft.logo.as_deref())
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, CompanyProfileRow>(&format!(
                    "INSERT INTO company_profile (name, whatsapp_number, address, email, logo) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING {COMPANY_COLUMNS}"
                ))
                .bind(&draft.name)
                .bind(&draft.whatsapp_number)
                .bind(&draft.address)
                .bind(email)
                .bind(draft.logo.as_deref())
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        CompanyProfile::try_from(row)
    }
}
