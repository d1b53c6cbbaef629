//! JSON representations of the storefront records.
//!
//! Field names match what the mobile storefront client reads. Image fields
//! carry full media URLs, not stored paths.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use vitrine_core::{
    BoutiqueId, CategoryId, CompanyProfileId, Email, Price, ProductId, SliderId, VendorId,
};

use crate::models::{Boutique, Category, CompanyProfile, MediaUrl, Product, Slider, Vendor};

/// Product representation.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub image: Option<String>,
    pub boutique: BoutiqueId,
    pub categories: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductView {
    #[must_use]
    pub fn new(product: &Product, media: &MediaUrl) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            image: media.resolve_opt(product.image.as_deref()),
            boutique: product.boutique_id,
            categories: product.categories.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }

    #[must_use]
    pub fn list(products: &[Product], media: &MediaUrl) -> Vec<Self> {
        products.iter().map(|p| Self::new(p, media)).collect()
    }
}

/// Category representation.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub boutique: BoutiqueId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            boutique: category.boutique_id,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

/// Boutique representation with its products nested.
#[derive(Debug, Clone, Serialize)]
pub struct BoutiqueView {
    pub id: BoutiqueId,
    pub name: String,
    pub image: Option<String>,
    pub description: String,
    pub owner: Option<VendorId>,
    pub products: Vec<ProductView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BoutiqueView {
    #[must_use]
    pub fn new(boutique: &Boutique, products: Vec<ProductView>, media: &MediaUrl) -> Self {
        Self {
            id: boutique.id,
            name: boutique.name.clone(),
            image: media.resolve_opt(boutique.image.as_deref()),
            description: boutique.description.clone(),
            owner: boutique.owner_id,
            products,
            created_at: boutique.created_at,
            updated_at: boutique.updated_at,
        }
    }
}

/// Nest every product under its boutique, keeping both orders.
#[must_use]
pub fn boutiques_with_products(
    boutiques: &[Boutique],
    products: &[Product],
    media: &MediaUrl,
) -> Vec<BoutiqueView> {
    let mut by_boutique: HashMap<BoutiqueId, Vec<ProductView>> = HashMap::new();
    for product in products {
        by_boutique
            .entry(product.boutique_id)
            .or_default()
            .push(ProductView::new(product, media));
    }

    boutiques
        .iter()
        .map(|b| BoutiqueView::new(b, by_boutique.remove(&b.id).unwrap_or_default(), media))
        .collect()
}

/// The vendor's own boutique, as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub boutique: BoutiqueView,
    pub categories: Vec<CategoryView>,
}

/// Home page slide representation.
#[derive(Debug, Clone, Serialize)]
pub struct SliderView {
    pub id: SliderId,
    pub image: String,
    pub title: String,
    pub description: String,
    pub order: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SliderView {
    #[must_use]
    pub fn new(slider: &Slider, media: &MediaUrl) -> Self {
        Self {
            id: slider.id,
            image: media.resolve(&slider.image),
            title: slider.title.clone(),
            description: slider.description.clone(),
            order: slider.order,
            created_at: slider.created_at,
            updated_at: slider.updated_at,
        }
    }
}

/// Company profile representation.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyProfileView {
    pub id: CompanyProfileId,
    pub name: String,
    pub whatsapp_number: String,
    pub address: String,
    pub email: Option<Email>,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyProfileView {
    #[must_use]
    pub fn new(profile: &CompanyProfile, media: &MediaUrl) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            whatsapp_number: profile.whatsapp_number.clone(),
            address: profile.address.clone(),
            email: profile.email.clone(),
            logo: media.resolve_opt(profile.logo.as_deref()),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Vendor account representation. Never includes the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct VendorView {
    pub id: VendorId,
    pub username: String,
    pub email: Option<Email>,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
    pub boutique: Option<BoutiqueId>,
}

impl From<&Vendor> for VendorView {
    fn from(vendor: &Vendor) -> Self {
        Self {
            id: vendor.id,
            username: vendor.username.clone(),
            email: vendor.email.clone(),
            is_staff: vendor.is_staff,
            date_joined: vendor.date_joined,
            boutique: vendor.boutique_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn product(id: i32, boutique: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Produit {id}"),
            description: "Description".to_owned(),
            price: Price::new(Decimal::new(1999, 2)).unwrap(),
            stock: 4,
            image: Some("product_images/p.jpg".to_owned()),
            boutique_id: BoutiqueId::new(boutique),
            categories: vec![CategoryId::new(2)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn boutique(id: i32) -> Boutique {
        Boutique {
            id: BoutiqueId::new(id),
            name: format!("Boutique {id}"),
            image: None,
            description: String::new(),
            owner_id: Some(VendorId::new(id)),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_shape() {
        let view = ProductView::new(&product(1, 3), &MediaUrl::default());
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["price"], json!("19.99"));
        assert_eq!(value["image"], json!("/media/product_images/p.jpg"));
        assert_eq!(value["boutique"], json!(3));
        assert_eq!(value["categories"], json!([2]));
        assert!(value.get("boutique_id").is_none());
    }

    #[test]
    fn test_vendor_shape_hides_account_internals() {
        let vendor = Vendor {
            id: VendorId::new(1),
            username: "awa".to_owned(),
            email: None,
            is_active: true,
            is_staff: false,
            date_joined: Utc::now(),
            last_login: None,
            boutique_id: Some(BoutiqueId::new(5)),
        };
        let value = serde_json::to_value(VendorView::from(&vendor)).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            ["boutique", "date_joined", "email", "id", "is_staff", "username"]
        );
    }

    #[test]
    fn test_products_nested_under_their_boutique() {
        let boutiques = [boutique(1), boutique(2), boutique(3)];
        let products = [product(10, 2), product(11, 1), product(12, 2)];

        let views = boutiques_with_products(&boutiques, &products, &MediaUrl::default());

        let ids: Vec<Vec<i32>> = views
            .iter()
            .map(|b| b.products.iter().map(|p| p.id.as_i32()).collect())
            .collect();
        assert_eq!(ids, vec![vec![11], vec![10, 12], vec![]]);
    }

    #[test]
    fn test_dashboard_flattens_boutique() {
        let view = DashboardView {
            boutique: BoutiqueView::new(&boutique(1), Vec::new(), &MediaUrl::default()),
            categories: Vec::new(),
        };
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["name"], json!("Boutique 1"));
        assert_eq!(value["owner"], json!(1));
        assert_eq!(value["categories"], json!([]));
        assert_eq!(value["image"], json!(null));
    }
}
