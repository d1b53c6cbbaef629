//! Product repository.
//!
//! Products are read together with their category links, aggregated into an
//! `INT4[]` column so one query returns the whole representation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgExecutor, PgPool};

use vitrine_core::{BoutiqueId, CategoryId, Price, ProductId};

use super::{RepositoryError, write_error};
use crate::models::{Product, ProductDraft};

/// `SELECT` over products with their sorted category IDs.
macro_rules! select_product {
    ($tail:literal) => {
        concat!(
            "SELECT p.id, p.title, p.description, p.price, p.stock, p.image, p.boutique_id, ",
            "ARRAY(SELECT pc.category_id FROM product_category pc ",
            "WHERE pc.product_id = p.id ORDER BY pc.category_id) AS categories, ",
            "p.created_at, p.updated_at ",
            "FROM product p ",
            $tail
        )
    };
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    description: String,
    price: Decimal,
    stock: i32,
    image: Option<String>,
    boutique_id: i32,
    categories: Vec<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative stock for product {}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            title: row.title,
            description: row.description,
            price,
            stock,
            image: row.image.filter(|i| !i.is_empty()),
            boutique_id: BoutiqueId::new(row.boutique_id),
            categories: row.categories.into_iter().map(CategoryId::new).collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn collect_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, RepositoryError> {
    rows.into_iter().map(Product::try_from).collect()
}

async fn fetch_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(select_product!("WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.map(Product::try_from).transpose()
}

async fn link_categories(
    conn: &mut PgConnection,
    id: ProductId,
    categories: &[CategoryId],
) -> Result<(), RepositoryError> {
    if categories.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO product_category (product_id, category_id) \
         SELECT $1, UNNEST($2::INT4[]) ON CONFLICT DO NOTHING",
    )
    .bind(id)
    .bind(categories)
    .execute(conn)
    .await
    .map_err(|e| write_error(e, "category does not exist"))?;
    Ok(())
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(select_product!("ORDER BY p.id"))
            .fetch_all(self.pool)
            .await?;

        collect_products(rows)
    }

    /// List the products of a boutique.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_boutique(
        &self,
        boutique_id: BoutiqueId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(select_product!(
            "WHERE p.boutique_id = $1 ORDER BY p.id"
        ))
        .bind(boutique_id)
        .fetch_all(self.pool)
        .await?;

        collect_products(rows)
    }

    /// Count every product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// One page of products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(select_product!(
            "ORDER BY p.id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        collect_products(rows)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        fetch_by_id(self.pool, id).await
    }

    /// Create a product in a boutique, with its category links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the boutique or a category
    /// no longer exists.
    pub async fn create(
        &self,
        boutique_id: BoutiqueId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, ProductId>(
            "INSERT INTO product (title, description, price, stock, image, boutique_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.stock)
        .bind(draft.image.as_deref())
        .bind(boutique_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "boutique does not exist"))?;

        if let Some(categories) = &draft.categories {
            link_categories(&mut tx, id, categories).await?;
        }

        let product = fetch_by_id(&mut *tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        tx.commit().await?;

        Ok(product)
    }

    /// Overwrite a product's fields. Category links are replaced only when
    /// the draft carries a category list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if a category no longer exists.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE product SET title = $2, description = $3, price = $4, stock = $5, \
             image = $6, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.stock)
        .bind(draft.image.as_deref())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        if let Some(categories) = &draft.categories {
            sqlx::query("DELETE FROM product_category WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_categories(&mut tx, id, categories).await?;
        }

        let product = fetch_by_id(&mut *tx, id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        tx.commit().await?;

        Ok(product)
    }

    /// Delete a product and its category links.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ProductRow {
        ProductRow {
            id: 5,
            title: "Sac".to_owned(),
            description: "Sac en cuir".to_owned(),
            price: Decimal::new(4500, 2),
            stock: 2,
            image: Some(String::new()),
            boutique_id: 1,
            categories: vec![1, 4],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let product = Product::try_from(row()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(product.price.to_string(), "45.00");
        assert_eq!(product.image, None);
        assert_eq!(
            product.categories,
            vec![CategoryId::new(1), CategoryId::new(4)]
        );
    }

    #[test]
    fn test_row_with_negative_stock_is_corrupt() {
        let mut bad = row();
        bad.stock = -1;
        assert!(matches!(
            Product::try_from(bad),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_select_product_appends_tail() {
        assert!(select_product!("WHERE p.id = $1").ends_with("FROM product p WHERE p.id = $1"));
    }
}
