//! Database migration command.
//!
//! Applies the API migrations from `crates/api/migrations/`, then creates
//! the `tower_sessions` schema used by the session store.
//!
//! ```text
//! migrations/
//! ├── 20250601000001_create_storefront_content.sql
//! ├── 20250601000002_create_vendors_and_boutiques.sql
//! └── 20250601000003_create_catalog.sql
//! ```

use tower_sessions_sqlx_store::PostgresStore;

use super::{ConnectError, connect};

/// Errors that can occur while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
