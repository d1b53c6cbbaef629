//! Vendor category handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use vitrine_core::CategoryId;

use super::extract::JsonBody;
use super::views::CategoryView;
use crate::db::CategoryRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireVendor;
use crate::models::{Category, CategoryInput, Vendor, WriteMode};
use crate::services::ensure_owner;
use crate::state::AppState;

/// List the caller's categories.
///
/// GET /categories/
pub async fn index(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
) -> Result<Json<Vec<CategoryView>>> {
    let Some(boutique_id) = vendor.boutique_id else {
        return Ok(Json(Vec::new()));
    };

    let categories = CategoryRepository::new(state.pool())
        .list_by_boutique(boutique_id)
        .await?;

    Ok(Json(categories.iter().map(CategoryView::from).collect()))
}

/// Create a category in the caller's boutique.
///
/// POST /categories/
pub async fn create(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryView>)> {
    let boutique_id = vendor.boutique_id.ok_or(AppError::NoBoutiqueAssociated)?;
    let draft = input.validate(WriteMode::Create)?;

    let category = CategoryRepository::new(state.pool())
        .create(boutique_id, &draft)
        .await?;

    tracing::info!(vendor_id = %vendor.id, category_id = %category.id, "category created");
    add_breadcrumb(
        "category",
        "category created",
        &[("category_id", category.id.to_string()), ("vendor_id", vendor.id.to_string())],
    );

    Ok((StatusCode::CREATED, Json(CategoryView::from(&category))))
}

/// Get one of the caller's categories.
///
/// GET /categories/{id}/
pub async fn show(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(id): Path<CategoryId>,
) -> Result<Json<CategoryView>> {
    let category = owned_category(&state, &vendor, id).await?;
    Ok(Json(CategoryView::from(&category)))
}

/// Replace a category's fields.
///
/// PUT /categories/{id}/
pub async fn replace(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(id): Path<CategoryId>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Result<Json<CategoryView>> {
    let category = owned_category(&state, &vendor, id).await?;
    let draft = input.validate(WriteMode::Replace(&category))?;

    let updated = CategoryRepository::new(state.pool())
        .update(category.id, &draft)
        .await?;
    add_breadcrumb(
        "category",
        "category updated",
        &[("category_id", updated.id.to_string()), ("vendor_id", vendor.id.to_string())],
    );

    Ok(Json(CategoryView::from(&updated)))
}

/// Update some of a category's fields.
///
/// PATCH /categories/{id}/
pub async fn patch(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(id): Path<CategoryId>,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Result<Json<CategoryView>> {
    let category = owned_category(&state, &vendor, id).await?;
    let draft = input.validate(WriteMode::Patch(&category))?;

    let updated = CategoryRepository::new(state.pool())
        .update(category.id, &draft)
        .await?;
    add_breadcrumb(
        "category",
        "category updated",
        &[("category_id", updated.id.to_string()), ("vendor_id", vendor.id.to_string())],
    );

    Ok(Json(CategoryView::from(&updated)))
}

/// Delete a category. Products keep existing without the link.
///
/// DELETE /categories/{id}/
pub async fn destroy(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    let category = owned_category(&state, &vendor, id).await?;
    CategoryRepository::new(state.pool())
        .delete(category.id)
        .await?;

    tracing::info!(vendor_id = %vendor.id, category_id = %category.id, "category deleted");
    add_breadcrumb(
        "category",
        "category deleted",
        &[("category_id", category.id.to_string()), ("vendor_id", vendor.id.to_string())],
    );

    Ok(StatusCode::NO_CONTENT)
}

async fn owned_category(state: &AppState, vendor: &Vendor, id: CategoryId) -> Result<Category> {
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found.".to_owned()))?;

    Ok(ensure_owner(category, vendor)?)
}
