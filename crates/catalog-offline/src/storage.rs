//! Named, versioned asset cache stores

use std::sync::Arc;

use dashmap::DashMap;

use crate::request::{AssetRequest, AssetResponse};

/// One named store of request -> response pairs
#[derive(Debug, Clone, Default)]
pub struct AssetCache {
    entries: Arc<DashMap<String, AssetResponse>>,
}

impl AssetCache {
    /// Add or replace the entry for `request`. Non-GET requests are ignored.
    pub fn put(&self, request: &AssetRequest, response: AssetResponse) -> bool {
        if !request.is_retrieval() {
            return false;
        }
        self.entries.insert(request.cache_key().to_string(), response);
        true
    }

    pub fn match_request(&self, request: &AssetRequest) -> Option<AssetResponse> {
        if !request.is_retrieval() {
            return None;
        }
        self.entries
            .get(request.cache_key())
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached URLs, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

/// All cache stores, keyed by generation name
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    stores: Arc<DashMap<String, AssetCache>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the named store, creating it if needed
    pub fn open(&self, name: &str) -> AssetCache {
        self.stores.entry(name.to_string()).or_default().clone()
    }

    pub fn has(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Store names, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.stores.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn delete(&self, name: &str) -> bool {
        self.stores.remove(name).is_some()
    }

    /// Look the request up in every store
    pub fn match_request(&self, request: &AssetRequest) -> Option<AssetResponse> {
        self.keys().into_iter().find_map(|name| {
            self.stores
                .get(&name)
                .and_then(|store| store.value().match_request(request))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{Method, Url};

    fn get(url: &str) -> AssetRequest {
        AssetRequest::get(Url::parse(url).unwrap())
    }

    #[test]
    fn test_put_and_match() {
        let storage = CacheStorage::new();
        let cache = storage.open("v1");
        assert!(cache.put(&get("https://a.test/style.css?v=2"), AssetResponse::new(200, "body{}")));

        let hit = storage.match_request(&get("https://a.test/style.css?v=2")).unwrap();
        assert_eq!(hit.body, b"body{}");
        assert!(storage.match_request(&get("https://a.test/style.css?v=3")).is_none());
    }

    #[test]
    fn test_non_get_is_never_stored_or_matched() {
        let storage = CacheStorage::new();
        let cache = storage.open("v1");
        let url = Url::parse("https://a.test/form").unwrap();
        let post = AssetRequest::new(Method::POST, url.clone());

        assert!(!cache.put(&post, AssetResponse::new(200, "ok")));
        assert!(cache.is_empty());

        cache.put(&AssetRequest::get(url), AssetResponse::new(200, "ok"));
        assert!(storage.match_request(&post).is_none());
    }

    #[test]
    fn test_open_is_shared_and_delete_drops_store() {
        let storage = CacheStorage::new();
        storage.open("v1").put(&get("https://a.test/"), AssetResponse::new(200, "<html>"));
        assert_eq!(storage.open("v1").len(), 1);
        storage.open("v2");

        assert_eq!(storage.keys(), vec!["v1".to_string(), "v2".to_string()]);
        assert!(storage.delete("v1"));
        assert!(!storage.delete("v1"));
        assert!(!storage.has("v1"));
        assert!(storage.match_request(&get("https://a.test/")).is_none());
    }
}
