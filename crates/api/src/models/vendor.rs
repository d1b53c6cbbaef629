//! Vendor account domain types.

use chrono::{DateTime, Utc};

use vitrine_core::{BoutiqueId, Email, Username, VendorId};

/// A vendor account (domain type).
///
/// `boutique_id` is the boutique whose `owner` is this vendor. The owner
/// column is unique, so a vendor owns at most one boutique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vendor {
    /// Unique vendor ID.
    pub id: VendorId,
    /// Login name.
    pub username: String,
    /// Contact email, if any.
    pub email: Option<Email>,
    /// Inactive vendors cannot log in.
    pub is_active: bool,
    /// Staff operators manage the store through the CLI.
    pub is_staff: bool,
    /// When the account was created.
    pub date_joined: DateTime<Utc>,
    /// When the vendor last logged in.
    pub last_login: Option<DateTime<Utc>>,
    /// The boutique owned by this vendor.
    pub boutique_id: Option<BoutiqueId>,
}

/// Data for a new vendor account.
#[derive(Debug, Clone)]
pub struct NewVendor {
    pub username: Username,
    pub email: Option<Email>,
    /// Argon2 PHC string, never the plaintext password.
    pub password_hash: String,
}
