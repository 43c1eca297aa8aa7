//! Postgres operations for the `products` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopcart_core::{Product, ProductInput};

use crate::store::{like_pattern, PgStore, ProductFilters, ProductPage, ProductStore};
use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sale_start: Option<DateTime<Utc>>,
    pub sale_end: Option<DateTime<Utc>>,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            sale_start: row.sale_start,
            sale_end: row.sale_end,
            photo: row.photo,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, sale_start, sale_end, photo, created_at, updated_at";

// Shared by the page and count queries. $4 is the reference time for the
// sale-window test, which mirrors `SaleWindow::contains`.
const PRODUCT_FILTER: &str = "WHERE ($1::BIGINT IS NULL OR id = $1) \
       AND ($2::TEXT IS NULL OR name ILIKE $2 OR description ILIKE $2) \
       AND (NOT $3 OR (sale_start IS NOT NULL \
                       AND sale_start <= $4 \
                       AND (sale_end IS NULL OR sale_end >= $4)))";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[async_trait]
impl ProductStore for PgStore {
    async fn ping(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }

    async fn list_products(&self, filters: &ProductFilters) -> Result<ProductPage, DbError> {
        let pattern = filters.search.as_deref().map(like_pattern);

        let count: i64 = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM products {PRODUCT_FILTER}"
        ))
        .bind(filters.id)
        .bind(pattern.as_deref())
        .bind(filters.on_sale)
        .bind(filters.now)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products {PRODUCT_FILTER} \
             ORDER BY id \
             LIMIT $5 OFFSET $6"
        ))
        .bind(filters.id)
        .bind(pattern.as_deref())
        .bind(filters.on_sale)
        .bind(filters.now)
        .bind(filters.limit)
        .bind(filters.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(ProductPage {
            count,
            items: rows.into_iter().map(Product::from).collect(),
        })
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, DbError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, DbError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, description, price, sale_start, sale_end, photo) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.sale_start)
        .bind(input.sale_end)
        .bind(&input.photo)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(product_id = row.id, "product created");
        Ok(row.into())
    }

    async fn update_product(
        &self,
        id: i64,
        input: &ProductInput,
    ) -> Result<Option<Product>, DbError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET \
                 name        = $2, \
                 description = $3, \
                 price       = $4, \
                 sale_start  = $5, \
                 sale_end    = $6, \
                 photo       = $7, \
                 updated_at  = NOW() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.sale_start)
        .bind(input.sale_end)
        .bind(&input.photo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_product(&self, id: i64) -> Result<bool, DbError> {
        // shopping_cart_items.product_id is ON DELETE CASCADE.
        let rows_affected = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
