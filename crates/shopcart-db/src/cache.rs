//! Product cache collaborator.
//!
//! Entries are keyed by [`shopcart_core::product_cache_key`] and hold the
//! [`CachedProduct`] projection. Any key-value backend can sit behind
//! [`ProductCache`]; [`MemoryCache`] keeps entries in process.

use async_trait::async_trait;
use dashmap::DashMap;
use shopcart_core::CachedProduct;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ProductCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedProduct>, CacheError>;

    async fn set(&self, key: &str, value: CachedProduct) -> Result<(), CacheError>;

    /// Remove `key`. Returns whether an entry was present.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CachedProduct>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ProductCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<CachedProduct>, CacheError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: CachedProduct) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.remove(key).is_some())
    }
}
