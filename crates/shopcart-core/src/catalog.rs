//! Catalog and cart entities as they exist in the store.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::SaleWindow;

/// A sellable product.
///
/// `price` is the list price; the price a shopper pays right now is derived
/// by [`crate::pricing::current_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sale_start: Option<DateTime<Utc>>,
    pub sale_end: Option<DateTime<Utc>>,
    /// Opaque reference to an uploaded photo. Upload handling lives elsewhere.
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[must_use]
    pub fn sale_window(&self) -> SaleWindow {
        SaleWindow {
            start: self.sale_start,
            end: self.sale_end,
        }
    }

    /// The subset of fields mirrored into the product cache.
    #[must_use]
    pub fn cache_entry(&self) -> CachedProduct {
        CachedProduct {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Product object ({}) \"{}\">", self.id, self.name)
    }
}

/// Validated field values for creating or fully replacing a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sale_start: Option<DateTime<Utc>>,
    pub sale_end: Option<DateTime<Utc>>,
    pub photo: Option<String>,
}

/// Cache projection of a product, stored under [`product_cache_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
}

/// Cache key for a product's cached projection.
#[must_use]
pub fn product_cache_key(product_id: i64) -> String {
    format!("product_data_{product_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingCart {
    pub id: i64,
    pub name: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ShoppingCart {
    /// Cart owner name, or `[Guest]` when none was given.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_blank(self.name.as_deref()).unwrap_or("[Guest]")
    }

    /// Delivery address, or `[No Address]` when none was given.
    #[must_use]
    pub fn display_address(&self) -> &str {
        non_blank(self.address.as_deref()).unwrap_or("[No Address]")
    }
}

impl fmt::Display for ShoppingCart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ShoppingCart object ({}) \"{}\" \"{}\">",
            self.id,
            self.display_name(),
            self.display_address()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingCartItem {
    pub id: i64,
    pub shopping_cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

/// A line requested for a new cart, before it has an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub product_id: i64,
    pub quantity: i32,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
