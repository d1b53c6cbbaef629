//! Vendor account repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use vitrine_core::{BoutiqueId, Email, VendorId};

use super::{RepositoryError, boutiques, write_error};
use crate::models::{Boutique, NewBoutique, NewVendor, Vendor};

/// `SELECT` over a vendor joined to the boutique it owns.
macro_rules! select_vendor {
    ($tail:literal) => {
        concat!(
            "SELECT v.id, v.username, v.email, v.is_active, v.is_staff, ",
            "v.date_joined, v.last_login, b.id AS boutique_id ",
            "FROM vendor_user v LEFT JOIN boutique b ON b.owner_id = v.id ",
            $tail
        )
    };
}

#[derive(Debug, sqlx::FromRow)]
struct VendorRow {
    id: i32,
    username: String,
    email: Option<String>,
    is_active: bool,
    is_staff: bool,
    date_joined: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
    boutique_id: Option<i32>,
}

#[derive(Debug, sqlx::FromRow)]
struct VendorWithHashRow {
    #[sqlx(flatten)]
    vendor: VendorRow,
    password_hash: String,
}

impl TryFrom<VendorRow> for Vendor {
    type Error = RepositoryError;

    fn try_from(row: VendorRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .filter(|e| !e.is_empty())
            .map(|e| Email::parse(&e))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: VendorId::new(row.id),
            username: row.username,
            email,
            is_active: row.is_active,
            is_staff: row.is_staff,
            date_joined: row.date_joined,
            last_login: row.last_login,
            boutique_id: row.boutique_id.map(BoutiqueId::new),
        })
    }
}

/// Repository for vendor database operations.
pub struct VendorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VendorRepository<'a> {
    /// Create a new vendor repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a vendor by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        let row = sqlx::query_as::<_, VendorRow>(select_vendor!("WHERE v.id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(Vendor::try_from).transpose()
    }

    /// Get a vendor by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Vendor>, RepositoryError> {
        let row = sqlx::query_as::<_, VendorRow>(select_vendor!("WHERE v.username = $1"))
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        row.map(Vendor::try_from).transpose()
    }

    /// Get a vendor and their password hash by username, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(Vendor, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, VendorWithHashRow>(concat!(
            "SELECT v.id, v.username, v.email, v.is_active, v.is_staff, ",
            "v.date_joined, v.last_login, b.id AS boutique_id, v.password_hash ",
            "FROM vendor_user v LEFT JOIN boutique b ON b.owner_id = v.id ",
            "WHERE v.username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((Vendor::try_from(r.vendor)?, r.password_hash)))
            .transpose()
    }

    /// Get a vendor's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(&self, id: VendorId) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM vendor_user WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(hash)
    }

    /// Replace a vendor's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the vendor doesn't exist.
    pub async fn set_password_hash(
        &self,
        id: VendorId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE vendor_user SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Stamp the vendor's last login time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn record_login(&self, id: VendorId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE vendor_user SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Create a vendor together with the boutique they own.
    ///
    /// Both rows are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_boutique(
        &self,
        vendor: &NewVendor,
        boutique: &NewBoutique,
    ) -> Result<(Vendor, Boutique), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, VendorRow>(
            "INSERT INTO vendor_user (username, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING id, username, email, is_active, is_staff, date_joined, last_login, \
                       NULL::INTEGER AS boutique_id",
        )
        .bind(vendor.username.as_str())
        .bind(vendor.email.as_ref().map(Email::as_str))
        .bind(&vendor.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "username already exists"))?;

        let mut created = Vendor::try_from(row)?;
        let boutique = boutiques::insert(&mut *tx, Some(created.id), boutique).await?;
        created.boutique_id = Some(boutique.id);

        tx.commit().await?;

        Ok((created, boutique))
    }

    /// Activate or deactivate a vendor account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no vendor has this username.
    pub async fn set_active(&self, username: &str, active: bool) -> Result<Vendor, RepositoryError> {
        let result = sqlx::query("UPDATE vendor_user SET is_active = $2 WHERE username = $1")
            .bind(username)
            .bind(active)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_username(username)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_select_vendor_joins_boutique() {
        let sql = select_vendor!("WHERE v.id = $1");
        assert!(sql.starts_with("SELECT v.id"));
        assert!(sql.contains("LEFT JOIN boutique b ON b.owner_id = v.id"));
        assert!(sql.ends_with("WHERE v.id = $1"));
    }
}
