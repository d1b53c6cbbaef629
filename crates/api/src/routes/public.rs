//! Public storefront handlers. No authentication.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::views::{
    BoutiqueView, CompanyProfileView, ProductView, SliderView, boutiques_with_products,
};
use crate::db::{BoutiqueRepository, CompanyProfileRepository, ProductRepository, SliderRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

const PRODUCTS_PATH: &str = "/public/products/";

/// `?page=` query parameter. Kept as a string so bad values become `404`.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Paginated list envelope.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Position of one page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub size: u64,
    pub count: u64,
}

impl PageWindow {
    /// Resolve a `?page=` value. Absent means the first page and `last`
    /// the final one. The first page always exists, even when empty.
    #[must_use]
    pub fn resolve(raw: Option<&str>, size: u32, count: u64) -> Option<Self> {
        let size = u64::from(size.max(1));
        let last = count.div_ceil(size).max(1);

        let number = match raw.map(str::trim) {
            None | Some("") => 1,
            Some("last") => last,
            Some(n) => n.parse::<u64>().ok()?,
        };
        if number == 0 || number > last {
            return None;
        }

        Some(Self {
            number,
            size,
            count,
        })
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number * self.size < self.count
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Absolute link to another page. The first page carries no `page`
    /// parameter.
    #[must_use]
    pub fn link(base_url: &str, path: &str, number: u64) -> String {
        if number <= 1 {
            format!("{base_url}{path}")
        } else {
            format!("{base_url}{path}?page={number}")
        }
    }

    #[must_use]
    pub fn next_link(&self, base_url: &str, path: &str) -> Option<String> {
        self.has_next()
            .then(|| Self::link(base_url, path, self.number + 1))
    }

    #[must_use]
    pub fn previous_link(&self, base_url: &str, path: &str) -> Option<String> {
        self.has_previous()
            .then(|| Self::link(base_url, path, self.number - 1))
    }
}

/// One page of every product.
///
/// GET /public/products/?page=N
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ProductView>>> {
    let repo = ProductRepository::new(state.pool());
    let count = u64::try_from(repo.count_all().await?).unwrap_or_default();

    let window = PageWindow::resolve(query.page.as_deref(), state.config().page_size, count)
        .ok_or_else(|| AppError::NotFound("Invalid page.".to_owned()))?;

    let limit = i64::try_from(window.size).map_err(|e| AppError::Internal(e.to_string()))?;
    let offset = i64::try_from(window.offset()).map_err(|e| AppError::Internal(e.to_string()))?;
    let products = repo.list_page(limit, offset).await?;

    let base_url = &state.config().base_url;
    Ok(Json(Page {
        count,
        next: window.next_link(base_url, PRODUCTS_PATH),
        previous: window.previous_link(base_url, PRODUCTS_PATH),
        results: ProductView::list(&products, state.media()),
    }))
}

/// Every boutique with its products.
///
/// GET /public/boutiques/
pub async fn boutiques(State(state): State<AppState>) -> Result<Json<Vec<BoutiqueView>>> {
    let boutique_repo = BoutiqueRepository::new(state.pool());
    let product_repo = ProductRepository::new(state.pool());
    let (boutiques, products) =
        tokio::try_join!(boutique_repo.list_all(), product_repo.list_all())?;

    Ok(Json(boutiques_with_products(
        &boutiques,
        &products,
        state.media(),
    )))
}

/// Every slide, in display order.
///
/// GET /public/sliders/
pub async fn sliders(State(state): State<AppState>) -> Result<Json<Vec<SliderView>>> {
    let sliders = SliderRepository::new(state.pool()).list_all().await?;
    let media = state.media();

    Ok(Json(sliders.iter().map(|s| SliderView::new(s, media)).collect()))
}

/// The company profile, or `{}` when none is configured.
///
/// GET /public/config/
pub async fn config(State(state): State<AppState>) -> Result<Response> {
    let profile = CompanyProfileRepository::new(state.pool()).first().await?;

    Ok(match profile {
        Some(profile) => Json(CompanyProfileView::new(&profile, state.media())).into_response(),
        None => Json(serde_json::json!({})).into_response(),
    })
}

/// Everything the storefront client needs on startup.
#[derive(Debug, Serialize)]
pub struct InitAppData {
    pub company_config: Option<CompanyProfileView>,
    pub sliders: Vec<SliderView>,
    pub boutiques: Vec<BoutiqueView>,
    pub products: Vec<ProductView>,
}

/// Bootstrap bundle.
///
/// GET /init-app-data/
pub async fn init_app_data(State(state): State<AppState>) -> Result<Json<InitAppData>> {
    let pool = state.pool();
    let company_repo = CompanyProfileRepository::new(pool);
    let slider_repo = SliderRepository::new(pool);
    let boutique_repo = BoutiqueRepository::new(pool);
    let product_repo = ProductRepository::new(pool);
    let (company, sliders, boutiques, products) = tokio::try_join!(
        company_repo.first(),
        slider_repo.list_all(),
        boutique_repo.list_all(),
        product_repo.list_all(),
    )?;

    let media = state.media();
    Ok(Json(InitAppData {
        company_config: company.map(|c| CompanyProfileView::new(&c, media)),
        sliders: sliders.iter().map(|s| SliderView::new(s, media)).collect(),
        boutiques: boutiques_with_products(&boutiques, &products, media),
        products: ProductView::list(&products, media),
    }))
}
