//! Authentication middleware and extractors.
//!
//! Provides the extractor that requires a logged-in vendor in route handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::db::VendorRepository;
use crate::error::AppError;
use crate::models::{CurrentVendor, Vendor, session::keys};
use crate::state::AppState;

/// Extractor that requires vendor authentication.
///
/// The session only carries the vendor's ID; the account is reloaded on
/// every request so a deactivated or deleted vendor is locked out
/// immediately. Rejects with `401` otherwise.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireVendor(vendor): RequireVendor,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", vendor.username)
/// }
/// ```
pub struct RequireVendor(pub Vendor);

impl FromRequestParts<AppState> for RequireVendor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_owned()))?;

        let current: CurrentVendor = session
            .get(keys::CURRENT_VENDOR)
            .await?
            .ok_or_else(not_authenticated)?;

        let vendor = VendorRepository::new(state.pool())
            .get_by_id(current.id)
            .await?
            .filter(|v| v.is_active)
            .ok_or_else(not_authenticated)?;

        Ok(Self(vendor))
    }
}

fn not_authenticated() -> AppError {
    AppError::Unauthorized("Authentication credentials were not provided.".to_owned())
}

/// Helper to set the current vendor in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_vendor(
    session: &Session,
    vendor: &CurrentVendor,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_VENDOR, vendor).await
}

/// Helper to clear the current vendor from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_vendor(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentVendor>(keys::CURRENT_VENDOR)
        .await?;
    Ok(())
}
