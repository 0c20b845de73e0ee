//! Offline asset caching for the catalog browser
//!
//! This crate provides:
//! - A pure request classifier (bypass / network-first / cache-first)
//! - Versioned cache stores with generation eviction
//! - The worker lifecycle (install, activate, fetch interception)
//! - A local axum proxy that routes requests through the worker

pub mod error;
pub mod network;
pub mod request;
pub mod server;
pub mod storage;
pub mod strategy;
pub mod worker;

pub use error::{OfflineError, Result};
pub use network::{HttpNetwork, Network};
pub use request::{AssetRequest, AssetResponse};
pub use storage::{AssetCache, CacheStorage};
pub use strategy::{Strategy, classify};
pub use worker::{
    ActivationReport, DEFAULT_BYPASS_HOSTS, DEFAULT_CACHE_NAME, DEFAULT_PRECACHE, OfflineWorker,
    WorkerConfig, WorkerState,
};
