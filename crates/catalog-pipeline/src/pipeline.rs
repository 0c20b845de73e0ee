//! Catalog pipeline - fetch, then filter/sort/render on every user command
//!
//! The pipeline owns all mutable state (cache, current catalog, filter
//! selections, rendered view). Fetch failures never escape: they are logged
//! and turned into the `Error` phase, leaving the cache untouched so a later
//! retry can still succeed.

use std::sync::Arc;
use std::time::Duration;

use catalog_core::{
    CatalogStats, ContactTemplate, CoreError, FilterState, ResultsView, SortKey, StatusFilter,
    apply_filters, parse_catalog, render,
};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::cache::{CatalogCache, DEFAULT_CACHE_TTL};
use crate::transport::CatalogTransport;
use crate::{Catalog, FetchError, Result};

/// Requests without a response after this long are cancelled
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Presentation state driven by the fetch stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub endpoint: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub contact: ContactTemplate,
}

impl PipelineOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            contact: ContactTemplate::default(),
        }
    }
}

pub struct CatalogPipeline<T> {
    transport: T,
    options: PipelineOptions,
    cache: CatalogCache,
    catalog: Catalog,
    filters: FilterState,
    stats: CatalogStats,
    view: ResultsView,
    last_error: Option<String>,
    phase: watch::Sender<Phase>,
}

impl<T: CatalogTransport> CatalogPipeline<T> {
    pub fn new(transport: T, options: PipelineOptions) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            transport,
            cache: CatalogCache::new(options.cache_ttl),
            options,
            catalog: Arc::from(Vec::new()),
            filters: FilterState::default(),
            stats: CatalogStats::default(),
            view: ResultsView::default(),
            last_error: None,
            phase,
        }
    }

    /// Load the catalog with the configured deadline
    pub async fn fetch_catalog(&mut self) -> Option<Catalog> {
        let deadline = self.options.timeout;
        self.fetch_catalog_with_deadline(deadline).await
    }

    /// Load the catalog, serving a fresh cache entry without touching the network.
    ///
    /// Returns `None` when the request failed; the pipeline is then in `Phase::Error`.
    pub async fn fetch_catalog_with_deadline(&mut self, deadline: Duration) -> Option<Catalog> {
        if let Some(products) = self.cache.fresh() {
            debug!(count = products.len(), "Serving catalog from cache");
            self.process(products.clone());
            return Some(products);
        }

        self.set_phase(Phase::Loading);
        info!(endpoint = %self.options.endpoint, "Fetching catalog");

        match self.request(deadline).await {
            Ok(products) => {
                info!(count = products.len(), "Catalog fetched");
                self.cache.store(products.clone());
                self.process(products.clone());
                Some(products)
            }
            Err(err) => {
                error!(error = %err, kind = ?err.kind(), "Error fetching products");
                self.last_error = Some(err.to_string());
                self.set_phase(Phase::Error);
                None
            }
        }
    }

    /// Retry trigger of the error view
    pub async fn retry(&mut self) -> Option<Catalog> {
        self.fetch_catalog().await
    }

    async fn request(&self, deadline: Duration) -> Result<Catalog> {
        let response = tokio::time::timeout(deadline, self.transport.get(&self.options.endpoint))
            .await
            .map_err(|_| FetchError::Timeout(deadline))??;

        if !response.is_success() {
            return Err(FetchError::Status(response.status));
        }

        let records = parse_catalog(&response.body)?;
        Ok(Arc::from(records))
    }

    fn process(&mut self, products: Catalog) {
        self.catalog = products;
        self.stats = CatalogStats::compute(&self.catalog);
        self.last_error = None;
        self.refresh_view();
        self.set_phase(Phase::Ready);
    }

    fn refresh_view(&mut self) {
        let filtered = apply_filters(&self.catalog, &self.filters);
        self.view = render(&filtered, self.catalog.len(), &self.options.contact);
    }

    fn set_phase(&self, phase: Phase) {
        self.phase.send_replace(phase);
    }

    pub fn on_search_changed(&mut self, text: impl Into<String>) -> &ResultsView {
        self.filters.search = text.into();
        self.refresh_view();
        &self.view
    }

    /// Apply a filter button by its identifier (`all`, `in-stock`, ...)
    pub fn on_filter_changed(&mut self, id: &str) -> std::result::Result<&ResultsView, CoreError> {
        let status: StatusFilter = id.parse()?;
        Ok(self.set_status_filter(status))
    }

    /// Apply a sort selector value (`name`, `price-low`, ...)
    pub fn on_sort_changed(&mut self, key: &str) -> std::result::Result<&ResultsView, CoreError> {
        let sort: SortKey = key.parse()?;
        Ok(self.set_sort(sort))
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) -> &ResultsView {
        self.filters.status = status;
        self.refresh_view();
        &self.view
    }

    pub fn set_sort(&mut self, sort: SortKey) -> &ResultsView {
        self.filters.sort = sort;
        self.refresh_view();
        &self.view
    }

    /// Clear search, show everything, sort by name
    pub fn reset_filters(&mut self) -> &ResultsView {
        self.filters = FilterState::default();
        self.refresh_view();
        &self.view
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn stats(&self) -> CatalogStats {
        self.stats
    }

    pub fn view(&self) -> &ResultsView {
        &self.view
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// True when the next fetch will be served without a request
    pub fn has_fresh_cache(&self) -> bool {
        self.cache.is_fresh()
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }
}
