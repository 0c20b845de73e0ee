#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use catalog_offline::{
    AssetRequest, AssetResponse, CacheStorage, Network, OfflineError, OfflineWorker, WorkerConfig,
};
use reqwest::Url;

pub const ORIGIN: &str = "https://ply.example";

/// In-memory network with per-URL hit counters and an offline switch
#[derive(Default)]
pub struct FakeNetwork {
    routes: Mutex<HashMap<String, AssetResponse>>,
    hits: Mutex<HashMap<String, usize>>,
    received: Mutex<Vec<AssetRequest>>,
    offline: AtomicBool,
}

impl FakeNetwork {
    pub fn site() -> Self {
        let network = FakeNetwork::default();
        network.route("/", AssetResponse::new(200, "<html>home</html>"));
        network.route("/index.html", AssetResponse::new(200, "<html>home</html>"));
        network.route("/style.css?v=2", AssetResponse::new(200, "body{}"));
        network.route("/script.js?v=2", AssetResponse::new(200, "fetchProducts()"));
        network.route("/manifest.json", AssetResponse::new(200, "{}"));
        network
    }

    pub fn route(&self, path_or_url: &str, response: AssetResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(absolute(path_or_url).to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn hits(&self, path_or_url: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .get(absolute(path_or_url).as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Most recent request the network saw
    pub fn last_request(&self) -> Option<AssetRequest> {
        self.received.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &AssetRequest) -> catalog_offline::Result<AssetResponse> {
        let key = request.url.to_string();
        *self.hits.lock().unwrap().entry(key.clone()).or_default() += 1;
        self.received.lock().unwrap().push(request.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(OfflineError::Network {
                url: key,
                reason: "connection refused".to_string(),
            });
        }
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| AssetResponse::new(404, "not found")))
    }
}

pub fn absolute(path_or_url: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path_or_url).unwrap()
}

pub fn get(path_or_url: &str) -> AssetRequest {
    AssetRequest::get(absolute(path_or_url))
}

pub fn worker<N: Network>(network: N, caches: CacheStorage) -> OfflineWorker<N> {
    OfflineWorker::new(WorkerConfig::new(Url::parse(ORIGIN).unwrap()), network, caches)
}

/// Give fire-and-forget cache writes a chance to run
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    check()
}
