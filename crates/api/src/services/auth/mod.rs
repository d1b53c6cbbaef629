//! Authentication service.
//!
//! Vendors log in with a username and password; hashes are Argon2id PHC
//! strings.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use vitrine_core::VendorId;

use crate::db::{RepositoryError, VendorRepository};
use crate::models::Vendor;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    vendors: VendorRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            vendors: VendorRepository::new(pool),
        }
    }

    /// Login with username and password.
    ///
    /// The password is checked before the account status, so an inactive
    /// account is only revealed to someone who knows its password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    /// Returns `AuthError::InactiveAccount` if the vendor has been deactivated.
    pub async fn login(&self, username: &str, password: &str) -> Result<Vendor, AuthError> {
        let (vendor, password_hash) = self
            .vendors
            .get_with_password_hash_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !vendor.is_active {
            return Err(AuthError::InactiveAccount);
        }

        self.vendors.record_login(vendor.id).await?;

        Ok(vendor)
    }

    /// Change a vendor's password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WrongPassword` if `old_password` doesn't match.
    /// Returns `AuthError::WeakPassword` if `new_password` is too short.
    pub async fn change_password(
        &self,
        vendor_id: VendorId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let current_hash = self
            .vendors
            .get_password_hash(vendor_id)
            .await?
            .ok_or(AuthError::Repository(RepositoryError::NotFound))?;

        let new_hash = replacement_hash(&current_hash, old_password, new_password)?;
        self.vendors.set_password_hash(vendor_id, &new_hash).await?;

        Ok(())
    }
}

/// Hash `new_password` once `old_password` matches `current_hash`.
///
/// The current password is checked first, so a caller who does not know it
/// learns nothing about the new-password rules.
fn replacement_hash(
    current_hash: &str,
    old_password: &str,
    new_password: &str,
) -> Result<String, AuthError> {
    verify_password(old_password, current_hash).map_err(|_| AuthError::WrongPassword)?;
    validate_password(new_password)?;
    hash_password(new_password)
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` describing the failed rule.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch or an unparseable hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
