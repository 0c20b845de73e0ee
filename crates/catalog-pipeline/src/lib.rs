//! Client-side data pipeline for the catalog browser
//!
//! This crate provides:
//! - The short-lived catalog cache
//! - A transport seam with a reqwest implementation
//! - `CatalogPipeline`: fetch with deadline, then filter/sort/render on demand

pub mod cache;
pub mod error;
pub mod pipeline;
pub mod transport;

use std::sync::Arc;

use catalog_core::ProductRecord;

pub use cache::{CacheEntry, CatalogCache, DEFAULT_CACHE_TTL};
pub use error::{FailureKind, FetchError, Result};
pub use pipeline::{CatalogPipeline, DEFAULT_TIMEOUT, Phase, PipelineOptions};
pub use transport::{CatalogTransport, HttpTransport, TransportResponse};

/// Immutable snapshot of one successful fetch
pub type Catalog = Arc<[ProductRecord]>;
