//! Ownership checks for vendor-managed records.
//!
//! A vendor may read or change a record only when it belongs to the
//! boutique they own. Because `boutique.owner_id` is unique, comparing the
//! record's boutique with the vendor's boutique is the same test as
//! comparing the boutique's owner with the vendor.

use vitrine_core::BoutiqueId;

use crate::models::{Boutique, Category, Product, Vendor};

/// A record owned through a boutique.
pub trait Ownable {
    /// Whether `vendor` owns this record.
    fn is_owned_by(&self, vendor: &Vendor) -> bool;
}

fn owns_boutique(vendor: &Vendor, boutique_id: BoutiqueId) -> bool {
    vendor.boutique_id == Some(boutique_id)
}

impl Ownable for Boutique {
    fn is_owned_by(&self, vendor: &Vendor) -> bool {
        self.owner_id == Some(vendor.id)
    }
}

impl Ownable for Product {
    fn is_owned_by(&self, vendor: &Vendor) -> bool {
        owns_boutique(vendor, self.boutique_id)
    }
}

impl Ownable for Category {
    fn is_owned_by(&self, vendor: &Vendor) -> bool {
        owns_boutique(vendor, self.boutique_id)
    }
}

/// Error returned when a vendor touches a record they don't own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("you do not have permission to access this resource")]
pub struct NotOwner;

/// Pass the record through if `vendor` owns it.
///
/// # Errors
///
/// Returns [`NotOwner`] otherwise.
pub fn ensure_owner<T: Ownable>(record: T, vendor: &Vendor) -> Result<T, NotOwner> {
    if record.is_owned_by(vendor) {
        Ok(record)
    } else {
        Err(NotOwner)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use vitrine_core::{CategoryId, VendorId};

    use super::*;

    fn vendor(id: i32, boutique: Option<i32>) -> Vendor {
        Vendor {
            id: VendorId::new(id),
            username: format!("vendor{id}"),
            email: None,
            is_active: true,
            is_staff: false,
            date_joined: Utc::now(),
            last_login: None,
            boutique_id: boutique.map(BoutiqueId::new),
        }
    }

    fn category(boutique: i32) -> Category {
        Category {
            id: CategoryId::new(1),
            name: "Tissus".to_owned(),
            description: String::new(),
            boutique_id: BoutiqueId::new(boutique),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn boutique(owner: Option<i32>) -> Boutique {
        Boutique {
            id: BoutiqueId::new(1),
            name: "Chez Awa".to_owned(),
            image: None,
            description: String::new(),
            owner_id: owner.map(VendorId::new),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_passes() {
        assert!(ensure_owner(category(1), &vendor(7, Some(1))).is_ok());
        assert!(ensure_owner(boutique(Some(7)), &vendor(7, Some(1))).is_ok());
    }

    #[test]
    fn test_other_vendor_rejected() {
        assert_eq!(
            ensure_owner(category(1), &vendor(8, Some(2))).unwrap_err(),
            NotOwner
        );
        assert!(ensure_owner(boutique(Some(7)), &vendor(8, Some(2))).is_err());
    }

    #[test]
    fn test_vendor_without_boutique_owns_nothing() {
        assert!(ensure_owner(category(1), &vendor(9, None)).is_err());
        assert!(ensure_owner(boutique(None), &vendor(9, None)).is_err());
    }
}
