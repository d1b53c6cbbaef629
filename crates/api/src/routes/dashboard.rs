//! Vendor dashboard handler.

use axum::{Json, extract::State};

use super::views::{BoutiqueView, CategoryView, DashboardView, ProductView};
use crate::db::{BoutiqueRepository, CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::state::AppState;

/// The caller's boutique with its products and categories.
///
/// GET /dashboard/
pub async fn show(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
) -> Result<Json<DashboardView>> {
    let no_boutique = || AppError::NotFound("No boutique is associated with this account".to_owned());

    let boutique_id = vendor.boutique_id.ok_or_else(no_boutique)?;
    let boutique = BoutiqueRepository::new(state.pool())
        .get(boutique_id)
        .await?
        .ok_or_else(no_boutique)?;

    let product_repo = ProductRepository::new(state.pool());
    let category_repo = CategoryRepository::new(state.pool());
    let (products, categories) = tokio::try_join!(
        product_repo.list_by_boutique(boutique_id),
        category_repo.list_by_boutique(boutique_id),
    )?;

    let media = state.media();
    Ok(Json(DashboardView {
        boutique: BoutiqueView::new(&boutique, ProductView::list(&products, media), media),
        categories: categories.iter().map(CategoryView::from).collect(),
    }))
}
