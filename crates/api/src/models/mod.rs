//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`] and the JSON representations in [`crate::routes::views`].
//!
//! Write payloads (`*Input`) are deserialized leniently and turned into
//! drafts by their `validate` methods, which collect every field error at
//! once into [`ValidationErrors`].

pub mod boutique;
pub mod category;
pub mod company;
pub mod media;
pub mod product;
pub mod session;
pub mod slider;
pub mod validation;
pub mod vendor;

pub use boutique::{Boutique, NewBoutique};
pub use category::{Category, CategoryDraft, CategoryInput};
pub use company::{CompanyProfile, CompanyProfileDraft};
pub use media::MediaUrl;
pub use product::{Product, ProductDraft, ProductInput};
pub use session::CurrentVendor;
pub use slider::{NewSlider, Slider};
pub use validation::{ValidationErrors, WriteMode};
pub use vendor::{NewVendor, Vendor};
