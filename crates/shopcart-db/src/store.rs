//! Store boundary for products and carts.
//!
//! The server and CLI only talk to these traits. [`PgStore`] is the Postgres
//! implementation; [`crate::MemoryStore`] is an in-process one used by tests
//! and local runs without a database. Both enforce the same referential rules:
//! deleting a cart deletes its items, and deleting a product deletes every
//! cart item that references it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shopcart_core::{CartLine, NewCartItem, Product, ProductInput, ShoppingCart};
use sqlx::PgPool;

use crate::DbError;

/// Product listing criteria. All filters combine with AND.
#[derive(Debug, Clone)]
pub struct ProductFilters {
    pub id: Option<i64>,
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
    /// Keep only products whose sale window contains `now`.
    pub on_sale: bool,
    pub now: DateTime<Utc>,
    pub limit: i64,
    pub offset: i64,
}

impl ProductFilters {
    /// Unfiltered first page of `limit` products.
    #[must_use]
    pub fn page(limit: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            search: None,
            on_sale: false,
            now,
            limit,
            offset: 0,
        }
    }
}

/// One page of products plus the number of products matching the filters.
#[derive(Debug, Clone, Default)]
pub struct ProductPage {
    pub count: i64,
    pub items: Vec<Product>,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Verify the backing store is reachable.
    async fn ping(&self) -> Result<(), DbError>;

    /// Products matching `filters`, ordered by id.
    async fn list_products(&self, filters: &ProductFilters) -> Result<ProductPage, DbError>;

    async fn get_product(&self, id: i64) -> Result<Option<Product>, DbError>;

    async fn create_product(&self, input: &ProductInput) -> Result<Product, DbError>;

    /// Replace every field of product `id`. Returns `None` for an unknown id.
    async fn update_product(&self, id: i64, input: &ProductInput)
        -> Result<Option<Product>, DbError>;

    /// Delete product `id` and, by cascade, its cart items.
    /// Returns `false` for an unknown id.
    async fn delete_product(&self, id: i64) -> Result<bool, DbError>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    /// Create a cart with its items in one unit of work.
    ///
    /// Fails with [`DbError::UnknownProduct`] if any item references a missing
    /// product; nothing is written in that case.
    async fn create_cart(
        &self,
        name: Option<&str>,
        address: Option<&str>,
        items: &[NewCartItem],
    ) -> Result<ShoppingCart, DbError>;

    async fn get_cart(&self, id: i64) -> Result<Option<ShoppingCart>, DbError>;

    /// Every item of cart `cart_id` joined with its product, ordered by item id.
    async fn cart_lines(&self, cart_id: i64) -> Result<Vec<CartLine>, DbError>;

    /// Delete cart `id` together with its items. Returns `false` for an unknown id.
    async fn delete_cart(&self, id: i64) -> Result<bool, DbError>;

    /// Number of carts in existence, whether or not they hold items.
    async fn count_carts(&self) -> Result<i64, DbError>;

    /// Units of `product_id` summed over every cart item that references it.
    async fn sold_quantity(&self, product_id: i64) -> Result<i64, DbError>;
}

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Escape `%`, `_` and `\` so user text is matched literally by `ILIKE`.
pub(crate) fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("mug"), "%mug%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
