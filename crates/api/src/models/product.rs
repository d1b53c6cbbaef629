//! Product domain types and write payload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use vitrine_core::{BoutiqueId, CategoryId, Price, ProductId};

use super::media::MediaUrl;
use super::validation::{REQUIRED, TextField, ValidationErrors, WriteMode};

const TITLE: TextField = TextField::required("title", Some(200));
const DESCRIPTION: TextField = TextField::required("description", None);
const IMAGE: TextField = TextField::optional("image", Some(255));

/// A product listed by a boutique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    /// Relative media path of the product image.
    pub image: Option<String>,
    pub boutique_id: BoutiqueId,
    /// Linked categories, ascending.
    pub categories: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated product values ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub price: Price,
    /// Non-negative, fits the `INTEGER` column.
    pub stock: i32,
    pub image: Option<String>,
    /// `None` leaves the category links unchanged.
    pub categories: Option<Vec<CategoryId>>,
}

/// Product payload as sent by a vendor.
///
/// A `boutique` key is accepted and ignored: the boutique always comes
/// from the session.
#[derive(Debug, Default, Deserialize)]
pub struct ProductInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub categories: Option<Vec<CategoryId>>,
}

impl ProductInput {
    /// Map an echoed image URL back to the stored media path, so a product
    /// read and written back keeps the same image.
    #[must_use]
    pub fn with_stored_image(mut self, media: &MediaUrl) -> Self {
        self.image = self
            .image
            .map(|image| media.to_stored_path(image.trim()).to_owned());
        self
    }

    /// Validate the payload against the write mode.
    ///
    /// Category IDs are deduplicated here; whether they belong to the
    /// vendor's boutique is checked against the database by the caller.
    ///
    /// # Errors
    ///
    /// Returns every field error found.
    pub fn validate(self, mode: WriteMode<'_, Product>) -> Result<ProductDraft, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let fallback = mode.fallback();

        let title = TITLE.check(&mut errors, self.title, fallback.map(|p| p.title.as_str()));
        let description = DESCRIPTION.check(
            &mut errors,
            self.description,
            fallback.map(|p| p.description.as_str()),
        );

        let price = match (self.price, fallback) {
            (Some(amount), _) => Price::new(amount)
                .map_err(|e| errors.add("price", e.to_string()))
                .ok(),
            (None, Some(current)) => Some(current.price),
            (None, None) => {
                errors.add("price", REQUIRED);
                None
            }
        };

        let stock = match (self.stock, fallback) {
            (Some(stock), _) => check_stock(&mut errors, stock),
            (None, Some(current)) => i32::try_from(current.stock).ok(),
            (None, None) => {
                errors.add("stock", REQUIRED);
                None
            }
        };

        let image = match self.image {
            Some(path) => IMAGE
                .check(&mut errors, Some(path), None)
                .filter(|p| !p.is_empty()),
            None => mode.current().and_then(|p| p.image.clone()),
        };

        let categories = match (self.categories, mode) {
            (Some(mut ids), _) => {
                ids.sort_unstable();
                ids.dedup();
                Some(ids)
            }
            (None, WriteMode::Create) => Some(Vec::new()),
            (None, _) => None,
        };

        match (title, description, price, stock) {
            (Some(title), Some(description), Some(price), Some(stock)) if errors.is_empty() => {
                Ok(ProductDraft {
                    title,
                    description,
                    price,
                    stock,
                    image,
                    categories,
                })
            }
            _ => Err(errors),
        }
    }
}

fn check_stock(errors: &mut ValidationErrors, stock: i64) -> Option<i32> {
    if stock < 0 {
        errors.add("stock", "Ensure this value is greater than or equal to 0.");
        return None;
    }
    i32::try_from(stock)
        .map_err(|_| {
            errors.add(
                "stock",
                format!("Ensure this value is less than or equal to {}.", i32::MAX),
            );
        })
        .ok()
}
