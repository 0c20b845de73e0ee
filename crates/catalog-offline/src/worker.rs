//! Offline cache worker - install, activate, intercept
//!
//! The worker pre-caches a fixed set of core assets on install (all or
//! nothing), purges every other cache generation on activation, and then
//! answers intercepted requests with one of three strategies.

use futures_util::future::try_join_all;
use reqwest::Url;
use tracing::{debug, error, info, warn};

use crate::error::{OfflineError, Result};
use crate::network::Network;
use crate::request::{AssetRequest, AssetResponse};
use crate::storage::CacheStorage;
use crate::strategy::{Strategy, classify};

/// Bump on every deploy to invalidate old offline caches
pub const DEFAULT_CACHE_NAME: &str = "ply-gallery-cache-v2";

pub const DEFAULT_PRECACHE: [&str; 5] = [
    "/",
    "/index.html",
    "/style.css?v=2",
    "/script.js?v=2",
    "/manifest.json",
];

pub const DEFAULT_BYPASS_HOSTS: [&str; 2] = ["cdn.tailwindcss.com", "cdnjs.cloudflare.com"];

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub cache_name: String,
    pub origin: Url,
    pub precache: Vec<String>,
    pub bypass_hosts: Vec<String>,
}

impl WorkerConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            origin,
            precache: DEFAULT_PRECACHE.iter().map(|p| p.to_string()).collect(),
            bypass_hosts: DEFAULT_BYPASS_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    /// Cache generations removed during activation
    pub deleted: Vec<String>,
    pub claimed_clients: bool,
}

pub struct OfflineWorker<N> {
    config: WorkerConfig,
    network: N,
    caches: CacheStorage,
    state: WorkerState,
    controls_clients: bool,
}

impl<N: Network> OfflineWorker<N> {
    pub fn new(config: WorkerConfig, network: N, caches: CacheStorage) -> Self {
        Self {
            config,
            network,
            caches,
            state: WorkerState::Parsed,
            controls_clients: false,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn caches(&self) -> &CacheStorage {
        &self.caches
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn controls_clients(&self) -> bool {
        self.controls_clients
    }

    fn transition(&mut self, state: WorkerState) {
        debug!(from = ?self.state, to = ?state, "Worker state change");
        self.state = state;
    }

    /// Absolute request for each pre-cache path
    pub fn precache_requests(&self) -> Result<Vec<AssetRequest>> {
        self.config
            .precache
            .iter()
            .map(|path| {
                self.config
                    .origin
                    .join(path)
                    .map(AssetRequest::get)
                    .map_err(|e| OfflineError::InvalidUrl(path.clone(), e.to_string()))
            })
            .collect()
    }

    /// Pre-cache the core assets. Nothing is written unless every asset loads.
    ///
    /// Returns the number of cached entries. The worker skips waiting and is
    /// ready to activate as soon as this succeeds.
    pub async fn install(&mut self) -> Result<usize> {
        self.transition(WorkerState::Installing);

        let outcome = match self.precache_requests() {
            Ok(requests) => self
                .fetch_all(&requests)
                .await
                .map(|responses| (requests, responses)),
            Err(err) => Err(err),
        };

        match outcome {
            Ok((requests, responses)) => {
                let cache = self.caches.open(&self.config.cache_name);
                for (request, response) in requests.iter().zip(responses) {
                    cache.put(request, response);
                }
                info!(
                    cache = %self.config.cache_name,
                    assets = requests.len(),
                    "Offline worker installed"
                );
                self.transition(WorkerState::Installed);
                Ok(requests.len())
            }
            Err(err) => {
                error!(error = %err, "Offline worker install failed");
                self.transition(WorkerState::Redundant);
                Err(err)
            }
        }
    }

    async fn fetch_all(&self, requests: &[AssetRequest]) -> Result<Vec<AssetResponse>> {
        try_join_all(requests.iter().map(|request| async move {
            let response =
                self.network
                    .fetch(request)
                    .await
                    .map_err(|e| OfflineError::Precache {
                        url: request.url.to_string(),
                        reason: e.to_string(),
                    })?;
            if !response.is_ok() {
                return Err(OfflineError::Precache {
                    url: request.url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            Ok(response)
        }))
        .await
    }

    /// Delete every other cache generation and take control of open clients
    pub async fn activate(&mut self) -> Result<ActivationReport> {
        if self.state != WorkerState::Installed {
            return Err(OfflineError::InvalidState {
                expected: WorkerState::Installed,
                actual: self.state,
            });
        }
        self.transition(WorkerState::Activating);

        let deleted: Vec<String> = self
            .caches
            .keys()
            .into_iter()
            .filter(|name| name != &self.config.cache_name)
            .filter(|name| self.caches.delete(name))
            .collect();
        for name in &deleted {
            info!(cache = %name, "Deleted stale cache generation");
        }

        self.controls_clients = true;
        self.transition(WorkerState::Activated);
        Ok(ActivationReport {
            deleted,
            claimed_clients: self.controls_clients,
        })
    }

    /// Install then activate, logging the outcome
    pub async fn register(&mut self) -> Result<ActivationReport> {
        let result = match self.install().await {
            Ok(_) => self.activate().await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(_) => info!(scope = %self.config.origin, "Offline worker registration successful"),
            Err(err) => error!(error = %err, "Offline worker registration failed"),
        }
        result
    }

    /// Serve an intercepted request
    pub async fn handle_fetch(&self, request: AssetRequest) -> Result<AssetResponse> {
        if self.state != WorkerState::Activated {
            return self.network.fetch(&request).await;
        }

        match classify(&request, &self.config.origin, &self.config.bypass_hosts) {
            Strategy::Bypass => self.bypass(&request).await,
            Strategy::NetworkFirst => self.network_first(&request).await,
            Strategy::CacheFirst => self.cache_first(&request).await,
        }
    }

    async fn bypass(&self, request: &AssetRequest) -> Result<AssetResponse> {
        match self.network.fetch(request).await {
            Ok(response) => Ok(response),
            Err(err) => self.fallback(request, err),
        }
    }

    async fn network_first(&self, request: &AssetRequest) -> Result<AssetResponse> {
        match self.network.fetch(request).await {
            Ok(response) => {
                // The copy is written after the response has been handed back.
                let cache = self.caches.open(&self.config.cache_name);
                let request = request.clone();
                let copy = response.clone();
                tokio::spawn(async move {
                    cache.put(&request, copy);
                });
                Ok(response)
            }
            Err(err) => self.fallback(request, err),
        }
    }

    async fn cache_first(&self, request: &AssetRequest) -> Result<AssetResponse> {
        if let Some(cached) = self.caches.match_request(request) {
            debug!(url = %request.url, "Serving asset from cache");
            return Ok(cached);
        }

        let response = match self.network.fetch(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(url = %request.url, error = %err, "Asset unavailable");
                return Err(OfflineError::Offline(request.url.to_string()));
            }
        };
        if response.status == 200 && request.is_retrieval() {
            self.caches
                .open(&self.config.cache_name)
                .put(request, response.clone());
        }
        Ok(response)
    }

    fn fallback(&self, request: &AssetRequest, err: OfflineError) -> Result<AssetResponse> {
        match self.caches.match_request(request) {
            Some(cached) => {
                debug!(url = %request.url, error = %err, "Network failed, serving cached copy");
                Ok(cached)
            }
            None => {
                warn!(url = %request.url, error = %err, "Network failed and nothing cached");
                Err(OfflineError::Offline(request.url.to_string()))
            }
        }
    }
}
