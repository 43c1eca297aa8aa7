//! Product catalog handlers.
//!
//! - `GET    /api/v1/products`           : filtered, paginated listing
//! - `POST   /api/v1/products`           : create
//! - `GET    /api/v1/products/{id}`      : single product
//! - `PUT    /api/v1/products/{id}`      : full update, refreshes the cache entry
//! - `DELETE /api/v1/products/{id}`      : delete, invalidates the cache entry
//! - `GET    /api/v1/products/{id}/stats`: units sold and average per cart

mod detail;
mod list;
mod write;

pub(super) use detail::{get_product, get_product_stats};
pub(super) use list::list_products;
pub(super) use write::{create_product, delete_product, update_product};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shopcart_core::{current_price, is_on_sale, round_money, Product};

use super::{map_db_error, ApiError, AppState};

/// Product representation shared by every product endpoint.
#[derive(Debug, Serialize)]
pub(in crate::api) struct ProductItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sale_start: Option<DateTime<Utc>>,
    pub sale_end: Option<DateTime<Utc>>,
    pub photo: Option<String>,
    pub is_on_sale: bool,
    pub current_price: Decimal,
}

impl ProductItem {
    pub(in crate::api) fn from_product(product: Product, now: DateTime<Utc>) -> Self {
        let on_sale = is_on_sale(&product, now);
        let current = current_price(&product, now);
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: round_money(product.price),
            sale_start: product.sale_start,
            sale_end: product.sale_end,
            photo: product.photo,
            is_on_sale: on_sale,
            current_price: current,
        }
    }
}

/// Load product `id`, returning 404 if it does not exist.
async fn resolve_product(state: &AppState, id: i64, request_id: &str) -> Result<Product, ApiError> {
    state
        .products
        .get_product(id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| ApiError::not_found(request_id, format!("product {id} not found")))
}
