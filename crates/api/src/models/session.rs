//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use vitrine_core::VendorId;

use super::Vendor;

/// Session-stored vendor identity.
///
/// Only the ID is trusted: the vendor row is reloaded on every
/// authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentVendor {
    /// Vendor's database ID.
    pub id: VendorId,
    /// Username at login time.
    pub username: String,
}

impl From<&Vendor> for CurrentVendor {
    fn from(vendor: &Vendor) -> Self {
        Self {
            id: vendor.id,
            username: vendor.username.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in vendor.
    pub const CURRENT_VENDOR: &str = "current_vendor";
}
