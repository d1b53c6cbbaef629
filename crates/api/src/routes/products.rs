//! Vendor product handlers.
//!
//! Every handler is scoped to the caller's boutique: listings only show its
//! products, creation always writes into it, and single-product handlers
//! answer `403` for another vendor's product.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use vitrine_core::{BoutiqueId, CategoryId, ProductId};

use super::extract::JsonBody;
use super::views::ProductView;
use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireVendor;
use crate::models::{Product, ProductDraft, ProductInput, ValidationErrors, Vendor, WriteMode};
use crate::services::ensure_owner;
use crate::state::AppState;

/// List the caller's products.
///
/// GET /products/
pub async fn index(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
) -> Result<Json<Vec<ProductView>>> {
    let Some(boutique_id) = vendor.boutique_id else {
        return Ok(Json(Vec::new()));
    };

    let products = ProductRepository::new(state.pool())
        .list_by_boutique(boutique_id)
        .await?;

    Ok(Json(ProductView::list(&products, state.media())))
}

/// Create a product in the caller's boutique.
///
/// POST /products/
pub async fn create(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    JsonBody(input): JsonBody<ProductInput>,
) -> Result<(StatusCode, Json<ProductView>)> {
    let boutique_id = vendor.boutique_id.ok_or(AppError::NoBoutiqueAssociated)?;

    let draft = input
        .with_stored_image(state.media())
        .validate(WriteMode::Create)?;
    check_categories(&state, boutique_id, &draft).await?;

    let product = ProductRepository::new(state.pool())
        .create(boutique_id, &draft)
        .await?;

    tracing::info!(vendor_id = %vendor.id, product_id = %product.id, "product created");
    add_breadcrumb(
        "product",
        "product created",
        &[("product_id", product.id.to_string()), ("vendor_id", vendor.id.to_string())],
    );

    Ok((
        StatusCode::CREATED,
        Json(ProductView::new(&product, state.media())),
    ))
}

/// Get one of the caller's products.
///
/// GET /products/{id}/
pub async fn show(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = owned_product(&state, &vendor, id).await?;
    Ok(Json(ProductView::new(&product, state.media())))
}

/// Replace a product's fields.
///
/// PUT /products/{id}/
pub async fn replace(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(id): Path<ProductId>,
    JsonBody(input): JsonBody<ProductInput>,
) -> Result<Json<ProductView>> {
    let product = owned_product(&state, &vendor, id).await?;
    let draft = input
        .with_stored_image(state.media())
        .validate(WriteMode::Replace(&product))?;
    save(&state, &vendor, &product, &draft).await
}

/// Update some of a product's fields.
///
/// PATCH /products/{id}/
pub async fn patch(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(id): Path<ProductId>,
    JsonBody(input): JsonBody<ProductInput>,
) -> Result<Json<ProductView>> {
    let product = owned_product(&state, &vendor, id).await?;
    let draft = input
        .with_stored_image(state.media())
        .validate(WriteMode::Patch(&product))?;
    save(&state, &vendor, &product, &draft).await
}

/// Delete a product.
///
/// DELETE /products/{id}/
pub async fn destroy(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let product = owned_product(&state, &vendor, id).await?;
    ProductRepository::new(state.pool()).delete(product.id).await?;

    tracing::info!(vendor_id = %vendor.id, product_id = %product.id, "product deleted");
    add_breadcrumb(
        "product",
        "product deleted",
        &[("product_id", product.id.to_string()), ("vendor_id", vendor.id.to_string())],
    );

    Ok(StatusCode::NO_CONTENT)
}

async fn save(
    state: &AppState,
    vendor: &Vendor,
    product: &Product,
    draft: &ProductDraft,
) -> Result<Json<ProductView>> {
    check_categories(state, product.boutique_id, draft).await?;

    let updated = ProductRepository::new(state.pool())
        .update(product.id, draft)
        .await?;
    add_breadcrumb(
        "product",
        "product updated",
        &[("product_id", updated.id.to_string()), ("vendor_id", vendor.id.to_string())],
    );

    Ok(Json(ProductView::new(&updated, state.media())))
}

/// Load a product, answering `404` when missing and `403` when it belongs
/// to another boutique.
async fn owned_product(state: &AppState, vendor: &Vendor, id: ProductId) -> Result<Product> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found.".to_owned()))?;

    Ok(ensure_owner(product, vendor)?)
}

/// Reject category IDs that are not categories of the boutique.
async fn check_categories(
    state: &AppState,
    boutique_id: BoutiqueId,
    draft: &ProductDraft,
) -> Result<()> {
    let Some(requested) = draft.categories.as_deref() else {
        return Ok(());
    };

    let found = CategoryRepository::new(state.pool())
        .ids_in_boutique(boutique_id, requested)
        .await?;

    let errors = unknown_categories(requested, &found);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}

fn unknown_categories(requested: &[CategoryId], found: &[CategoryId]) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for id in requested.iter().filter(|id| !found.contains(id)) {
        errors.add(
            "categories",
            format!("Invalid pk \"{id}\" - object does not exist."),
        );
    }
    errors
}
