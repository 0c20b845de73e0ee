//! Transport seam between the fetch stage and the network

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;

use crate::{FetchError, Result};

/// Status and raw body of a catalog response
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues a single GET against the catalog endpoint
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse>;
}

#[async_trait]
impl<T: CatalogTransport + ?Sized> CatalogTransport for Arc<T> {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        (**self).get(url).await
    }
}

/// reqwest-backed transport. Deadlines are enforced by the pipeline, not here.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("catalog/", env!("CARGO_PKG_VERSION"), " (catalog browser)"))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
