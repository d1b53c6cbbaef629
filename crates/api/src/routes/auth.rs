//! Vendor authentication route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::extract::JsonBody;
use super::views::VendorView;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireVendor, clear_current_vendor, set_current_vendor};
use crate::models::validation::{BLANK, REQUIRED};
use crate::models::{CurrentVendor, ValidationErrors};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Plain `{"message": ...}` response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: VendorView,
    pub message: &'static str,
}

/// Change password form data.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Presence check for credential fields. Values are not trimmed.
fn credential(errors: &mut ValidationErrors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(v) if v.is_empty() => {
            errors.add(field, BLANK);
            None
        }
        Some(v) => Some(v),
    }
}

impl LoginRequest {
    fn validate(self) -> std::result::Result<(String, String), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let username = credential(&mut errors, "username", self.username.map(|u| u.trim().to_owned()));
        let password = credential(&mut errors, "password", self.password);

        match (username, password) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(errors),
        }
    }
}

/// Handle login.
///
/// POST /login/
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonBody(form): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (username, password) = form.validate()?;

    let vendor = match AuthService::new(state.pool()).login(&username, &password).await {
        Ok(vendor) => vendor,
        Err(e) => {
            tracing::warn!(username = %username, error = %e, "login failed");
            return Err(e.into());
        }
    };

    // New session ID on privilege change
    session.cycle_id().await?;
    set_current_vendor(&session, &CurrentVendor::from(&vendor)).await?;
    set_sentry_user(&vendor.id, &vendor.username);

    tracing::info!(vendor_id = %vendor.id, username = %vendor.username, "login succeeded");

    Ok(Json(LoginResponse {
        user: VendorView::from(&vendor),
        message: "Login successful",
    }))
}

/// Handle logout.
///
/// POST /logout/
///
/// Deletes the whole session from the store. Calling it without a session
/// is harmless.
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    clear_current_vendor(&session).await?;
    session.flush().await?;
    clear_sentry_user();

    Ok(Json(MessageResponse {
        message: "Logout successful",
    }))
}

/// Attach a rejected new password to its field.
fn new_password_error(err: AuthError, missing: Option<&'static str>) -> AppError {
    match err {
        AuthError::WeakPassword(msg) => AppError::Validation(ValidationErrors::single(
            "new_password",
            missing.map_or(msg, str::to_owned),
        )),
        other => other.into(),
    }
}

/// Handle password change.
///
/// POST /change-password/
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    RequireVendor(vendor): RequireVendor,
    JsonBody(form): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    // A missing current password can never match
    let old_password = form.old_password.unwrap_or_default();

    // Reported only once the current password has been accepted
    let missing_new = match form.new_password.as_deref() {
        None => Some(REQUIRED),
        Some("") => Some(BLANK),
        Some(_) => None,
    };
    let new_password = form.new_password.unwrap_or_default();

    AuthService::new(state.pool())
        .change_password(vendor.id, &old_password, &new_password)
        .await
        .map_err(|e| new_password_error(e, missing_new))?;

    // Keep the caller logged in under a fresh session ID
    session.cycle_id().await?;

    tracing::info!(vendor_id = %vendor.id, "password changed");

    Ok(Json(MessageResponse {
        message: "Password changed successfully",
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_wrong_password_reported_before_missing_new_password() {
        let err = new_password_error(AuthError::WrongPassword, Some(REQUIRED));
        assert!(matches!(err, AppError::Auth(AuthError::WrongPassword)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_new_password_reported_on_field() {
        let err = new_password_error(AuthError::WeakPassword("too short".to_owned()), Some(REQUIRED));
        let AppError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.messages("new_password"), [REQUIRED]);
    }

    #[test]
    fn test_weak_new_password_keeps_rule_message() {
        let err = new_password_error(AuthError::WeakPassword("too short".to_owned()), None);
        let AppError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.messages("new_password"), ["too short"]);
    }

    #[test]
    fn test_login_request_trims_username_only() {
        let form = LoginRequest {
            username: Some("  awa ".to_owned()),
            password: Some(" secret ".to_owned()),
        };
        assert_eq!(
            form.validate().ok(),
            Some(("awa".to_owned(), " secret ".to_owned()))
        );
    }
}
