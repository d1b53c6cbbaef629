//! Vendor account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a vendor and their boutique; prints a generated password
//! vitrine vendor create -u awa -e awa@example.com --boutique-name "Chez Awa"
//!
//! # Issue a new generated password
//! vitrine vendor reset-password -u awa
//!
//! # Lock or unlock an account
//! vitrine vendor deactivate -u awa
//! vitrine vendor activate -u awa
//! ```

use rand::{Rng, distr::Alphanumeric};
use thiserror::Error;
use vitrine_api::db::{RepositoryError, VendorRepository};
use vitrine_api::models::{NewBoutique, NewVendor};
use vitrine_api::services::AuthError;
use vitrine_api::services::auth::hash_password;
use vitrine_core::{Email, Username};

use super::{ConnectError, connect};

/// Length of the generated initial password.
const INITIAL_PASSWORD_LENGTH: usize = 12;

/// Errors that can occur during vendor operations.
#[derive(Debug, Error)]
pub enum VendorError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid boutique name: {0}")]
    InvalidBoutiqueName(String),

    #[error("Vendor not found: {0}")]
    NotFound(String),

    #[error("Vendor already exists with username: {0}")]
    VendorExists(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Random alphanumeric password handed to a new vendor.
fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(INITIAL_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

fn boutique_description(username: &Username, description: Option<String>) -> String {
    description
        .map(|d| d.trim().to_owned())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| format!("Boutique for {username}"))
}

/// Create a vendor and the boutique they own.
pub async fn create(
    username: &str,
    email: Option<&str>,
    boutique_name: &str,
    description: Option<String>,
) -> Result<(), VendorError> {
    let username =
        Username::parse(username).map_err(|e| VendorError::InvalidUsername(e.to_string()))?;
    let email = email
        .map(Email::parse)
        .transpose()
        .map_err(|e| VendorError::InvalidEmail(e.to_string()))?;

    let boutique_name = boutique_name.trim();
    if boutique_name.is_empty() {
        return Err(VendorError::InvalidBoutiqueName("cannot be empty".to_owned()));
    }
    if boutique_name.chars().count() > NewBoutique::NAME_MAX_LENGTH {
        return Err(VendorError::InvalidBoutiqueName(format!(
            "must be at most {} characters",
            NewBoutique::NAME_MAX_LENGTH
        )));
    }

    let password = generate_password();
    let boutique = NewBoutique {
        name: boutique_name.to_owned(),
        description: boutique_description(&username, description),
        image: Some(NewBoutique::DEFAULT_IMAGE.to_owned()),
    };
    let vendor = NewVendor {
        username: username.clone(),
        email,
        password_hash: hash_password(&password)?,
    };

    let pool = connect().await?;

    tracing::info!("Creating vendor: {}", username);

    let (vendor, boutique) = VendorRepository::new(&pool)
        .create_with_boutique(&vendor, &boutique)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => VendorError::VendorExists(username.to_string()),
            other => VendorError::Repository(other),
        })?;

    tracing::info!(
        "Vendor created successfully! ID: {}, Boutique: {} (ID: {})",
        vendor.id,
        boutique.name,
        boutique.id
    );

    #[allow(clippy::print_stdout)]
    {
        println!("Initial password for {}: {password}", vendor.username);
        println!("Share it with the vendor and ask them to change it after logging in.");
    }

    Ok(())
}

/// Replace a vendor's password with a generated one and print it.
pub async fn reset_password(username: &str) -> Result<(), VendorError> {
    let pool = connect().await?;
    let vendors = VendorRepository::new(&pool);

    let vendor = vendors
        .get_by_username(username)
        .await?
        .ok_or_else(|| VendorError::NotFound(username.to_owned()))?;

    let password = generate_password();
    vendors
        .set_password_hash(vendor.id, &hash_password(&password)?)
        .await?;

    tracing::info!("Password reset for vendor {} (ID: {})", vendor.username, vendor.id);

    #[allow(clippy::print_stdout)]
    {
        println!("New password for {}: {password}", vendor.username);
    }

    Ok(())
}

/// Set whether a vendor may log in.
pub async fn set_active(username: &str, active: bool) -> Result<(), VendorError> {
    let pool = connect().await?;

    let vendor = VendorRepository::new(&pool)
        .set_active(username, active)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => VendorError::NotFound(username.to_owned()),
            other => VendorError::Repository(other),
        })?;

    if vendor.is_active {
        tracing::info!("Vendor {} activated", vendor.username);
    } else {
        tracing::info!("Vendor {} deactivated", vendor.username);
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), INITIAL_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(password, generate_password());
    }

    #[test]
    fn test_boutique_description_default() {
        let username = Username::parse("awa").unwrap();
        assert_eq!(boutique_description(&username, None), "Boutique for awa");
        assert_eq!(
            boutique_description(&username, Some("  ".to_owned())),
            "Boutique for awa"
        );
        assert_eq!(
            boutique_description(&username, Some("Tissus wax".to_owned())),
            "Tissus wax"
        );
    }
}
