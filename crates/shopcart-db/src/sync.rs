//! Product writes that keep the product cache in step with the store.
//!
//! The store is the source of truth: a write that fails leaves the cache
//! untouched, and a cache failure after a successful write is logged rather
//! than surfaced, since the row has already changed.

use shopcart_core::{product_cache_key, Product, ProductInput};

use crate::cache::ProductCache;
use crate::store::ProductStore;
use crate::DbError;

/// Replace product `id` and refresh its cache entry with the new
/// name, description and price.
///
/// Returns `None` (and leaves the cache alone) for an unknown id.
///
/// # Errors
///
/// Returns [`DbError`] if the store update fails.
pub async fn update_and_refresh(
    products: &dyn ProductStore,
    cache: &dyn ProductCache,
    id: i64,
    input: &ProductInput,
) -> Result<Option<Product>, DbError> {
    let Some(product) = products.update_product(id, input).await? else {
        return Ok(None);
    };

    let key = product_cache_key(id);
    match cache.set(&key, product.cache_entry()).await {
        Ok(()) => tracing::debug!(product_id = id, cache_key = %key, "product cache refreshed"),
        Err(e) => {
            tracing::warn!(product_id = id, cache_key = %key, error = %e, "product cache refresh failed");
        }
    }

    Ok(Some(product))
}

/// Delete product `id` and invalidate its cache entry.
///
/// Returns `false` (and leaves the cache alone) for an unknown id.
///
/// # Errors
///
/// Returns [`DbError`] if the store delete fails.
pub async fn delete_and_invalidate(
    products: &dyn ProductStore,
    cache: &dyn ProductCache,
    id: i64,
) -> Result<bool, DbError> {
    if !products.delete_product(id).await? {
        return Ok(false);
    }

    let key = product_cache_key(id);
    match cache.delete(&key).await {
        Ok(present) => {
            tracing::debug!(product_id = id, cache_key = %key, present, "product cache invalidated");
        }
        Err(e) => {
            tracing::warn!(product_id = id, cache_key = %key, error = %e, "product cache invalidation failed");
        }
    }

    Ok(true)
}
