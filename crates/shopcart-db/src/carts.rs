//! Postgres operations for `shopping_carts` and `shopping_cart_items`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopcart_core::{CartLine, NewCartItem, Product, ShoppingCart, ShoppingCartItem};

use crate::store::{CartStore, PgStore};
use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `shopping_carts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartRow {
    pub id: i64,
    pub name: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CartRow> for ShoppingCart {
    fn from(row: CartRow) -> Self {
        ShoppingCart {
            id: row.id,
            name: row.name,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

/// A `shopping_cart_items` row joined with its product.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLineRow {
    pub item_id: i64,
    pub shopping_cart_id: i64,
    pub quantity: i32,
    pub product_id: i64,
    pub product_name: String,
    pub product_description: String,
    pub product_price: Decimal,
    pub sale_start: Option<DateTime<Utc>>,
    pub sale_end: Option<DateTime<Utc>>,
    pub photo: Option<String>,
    pub product_created_at: DateTime<Utc>,
    pub product_updated_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        CartLine {
            item: ShoppingCartItem {
                id: row.item_id,
                shopping_cart_id: row.shopping_cart_id,
                product_id: row.product_id,
                quantity: row.quantity,
            },
            product: Product {
                id: row.product_id,
                name: row.product_name,
                description: row.product_description,
                price: row.product_price,
                sale_start: row.sale_start,
                sale_end: row.sale_end,
                photo: row.photo,
                created_at: row.product_created_at,
                updated_at: row.product_updated_at,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[async_trait]
impl CartStore for PgStore {
    async fn create_cart(
        &self,
        name: Option<&str>,
        address: Option<&str>,
        items: &[NewCartItem],
    ) -> Result<ShoppingCart, DbError> {
        let mut tx = self.pool.begin().await?;

        let requested: Vec<i64> = items
            .iter()
            .map(|i| i.product_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let existing: HashSet<i64> =
            sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = ANY($1)")
                .bind(&requested)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();
        if let Some(missing) = items.iter().find(|i| !existing.contains(&i.product_id)) {
            return Err(DbError::UnknownProduct(missing.product_id));
        }

        let cart = sqlx::query_as::<_, CartRow>(
            "INSERT INTO shopping_carts (name, address) \
             VALUES ($1, $2) \
             RETURNING id, name, address, created_at",
        )
        .bind(name)
        .bind(address)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO shopping_cart_items (shopping_cart_id, product_id, quantity) \
                 VALUES ($1, $2, $3)",
            )
            .bind(cart.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(cart_id = cart.id, items = items.len(), "cart created");
        Ok(cart.into())
    }

    async fn get_cart(&self, id: i64) -> Result<Option<ShoppingCart>, DbError> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT id, name, address, created_at FROM shopping_carts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ShoppingCart::from))
    }

    async fn cart_lines(&self, cart_id: i64) -> Result<Vec<CartLine>, DbError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT \
                 i.id AS item_id, \
                 i.shopping_cart_id, \
                 i.quantity, \
                 p.id AS product_id, \
                 p.name AS product_name, \
                 p.description AS product_description, \
                 p.price AS product_price, \
                 p.sale_start, \
                 p.sale_end, \
                 p.photo, \
                 p.created_at AS product_created_at, \
                 p.updated_at AS product_updated_at \
             FROM shopping_cart_items i \
             JOIN products p ON p.id = i.product_id \
             WHERE i.shopping_cart_id = $1 \
             ORDER BY i.id",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    async fn delete_cart(&self, id: i64) -> Result<bool, DbError> {
        // shopping_cart_items.shopping_cart_id is ON DELETE CASCADE.
        let rows_affected = sqlx::query("DELETE FROM shopping_carts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn count_carts(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shopping_carts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn sold_quantity(&self, product_id: i64) -> Result<i64, DbError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT \
             FROM shopping_cart_items \
             WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
