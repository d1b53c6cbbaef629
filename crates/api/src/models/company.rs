//! Company profile.

use chrono::{DateTime, Utc};

use vitrine_core::{CompanyProfileId, Email};

/// The operator's public profile. Only the first record is ever served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    pub id: CompanyProfileId,
    pub name: String,
    /// Central WhatsApp number customers order through.
    pub whatsapp_number: String,
    pub address: String,
    pub email: Option<Email>,
    /// Relative media path of the logo.
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by `vitrine company set`.
#[derive(Debug, Clone)]
pub struct CompanyProfileDraft {
    pub name: String,
    pub whatsapp_number: String,
    pub address: String,
    pub email: Option<Email>,
    pub logo: Option<String>,
}
