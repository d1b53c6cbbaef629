//! Boutique domain types.

use chrono::{DateTime, Utc};

use vitrine_core::{BoutiqueId, VendorId};

/// A vendor's store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boutique {
    pub id: BoutiqueId,
    pub name: String,
    /// Relative media path of the illustration image.
    pub image: Option<String>,
    pub description: String,
    /// `None` for boutiques created before vendor accounts existed.
    pub owner_id: Option<VendorId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a new boutique.
#[derive(Debug, Clone)]
pub struct NewBoutique {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

impl NewBoutique {
    /// Maximum length of a boutique name.
    pub const NAME_MAX_LENGTH: usize = 100;

    /// Placeholder image assigned to boutiques created from the CLI.
    pub const DEFAULT_IMAGE: &'static str = "boutique_images/default.jpg";
}
