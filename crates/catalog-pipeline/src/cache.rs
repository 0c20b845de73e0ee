//! Short-lived in-memory cache for the last fetched catalog

use std::time::Duration;

use tokio::time::Instant;

use crate::Catalog;

/// Catalog responses stay usable for 5 minutes
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Last successful fetch and when it happened
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub products: Catalog,
    pub fetched_at: Instant,
}

impl CacheEntry {
    pub fn new(products: Catalog) -> Self {
        Self {
            products,
            fetched_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Holds at most one entry, replaced wholesale on every successful fetch
#[derive(Debug)]
pub struct CatalogCache {
    entry: Option<CacheEntry>,
    ttl: Duration,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached catalog if it is younger than the TTL
    pub fn fresh(&self) -> Option<Catalog> {
        self.entry
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.products.clone())
    }

    pub fn is_fresh(&self) -> bool {
        self.entry.as_ref().is_some_and(|entry| entry.is_fresh(self.ttl))
    }

    pub fn store(&mut self, products: Catalog) {
        self.entry = Some(CacheEntry::new(products));
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn get_even_if_expired(&self) -> Option<Catalog> {
        self.entry.as_ref().map(|entry| entry.products.clone())
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
