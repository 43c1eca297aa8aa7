pub mod app_config;
pub mod cart;
pub mod catalog;
pub mod catalog_file;
pub mod config;
pub mod pricing;
pub mod validation;

#[cfg(test)]
mod config_test;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use cart::{
    average_product_sold, item_total, summarize, CartLine, CartSummary, SoldAverage, TAX_RATE,
};
pub use catalog::{
    product_cache_key, CachedProduct, NewCartItem, Product, ProductInput, ShoppingCart,
    ShoppingCartItem,
};
pub use catalog_file::{load_catalog, parse_catalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{current_price, is_on_sale, round_money, SaleWindow, DISCOUNT_RATE};
pub use validation::{
    parse_price, validate_cart, validate_product, validate_quantity, FieldErrors, ProductDraft,
    ValidationError,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}
