//! Database operations for the storefront `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `vendor_user` - Vendor accounts (username + Argon2 hash)
//! - `boutique` - One store per vendor (`owner_id` is unique)
//! - `category` - Categories, scoped to a boutique
//! - `product` - Products, scoped to a boutique
//! - `product_category` - Product/category links
//! - `slider` - Home page slides
//! - `company_profile` - Operator contact details
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p vitrine-cli -- migrate
//! ```
//!
//! Queries are built at runtime with `sqlx::query_as` into private row
//! types, which are converted into the domain models of [`crate::models`].

pub mod boutiques;
pub mod categories;
pub mod company;
pub mod products;
pub mod sliders;
pub mod vendors;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use boutiques::BoutiqueRepository;
pub use categories::CategoryRepository;
pub use company::CompanyProfileRepository;
pub use products::ProductRepository;
pub use sliders::SliderRepository;
pub use vendors::VendorRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map an insert/update error, turning constraint violations into
/// [`RepositoryError::Conflict`].
pub(crate) fn write_error(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && (db_err.is_unique_violation() || db_err.is_foreign_key_violation())
    {
        return RepositoryError::Conflict(conflict.to_owned());
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
