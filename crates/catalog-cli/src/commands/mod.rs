pub mod browse;
pub mod completions;
pub mod config;
pub mod list;
pub mod serve;
pub mod stats;

use anyhow::Result;
use catalog_config::Config;
use catalog_core::ContactTemplate;
use catalog_pipeline::{CatalogPipeline, HttpTransport, PipelineOptions};

pub fn pipeline_options(config: &Config) -> PipelineOptions {
    PipelineOptions {
        timeout: config.api.timeout(),
        cache_ttl: config.api.cache_ttl(),
        contact: ContactTemplate {
            phone: config.contact.phone.clone(),
            business_name: config.contact.business_name.clone(),
        },
        ..PipelineOptions::new(config.api.endpoint.clone())
    }
}

pub fn build_pipeline(config: &Config) -> Result<CatalogPipeline<HttpTransport>> {
    let transport = HttpTransport::new()?;
    Ok(CatalogPipeline::new(transport, pipeline_options(config)))
}

/// Fetch once for the one-shot commands, turning the error phase into an error
pub async fn load_catalog(config: &Config) -> Result<CatalogPipeline<HttpTransport>> {
    let mut pipeline = build_pipeline(config)?;
    if pipeline.fetch_catalog().await.is_none() {
        anyhow::bail!(
            "Failed to load products: {}",
            pipeline.last_error().unwrap_or("unknown error")
        );
    }
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pipeline_options_follow_config() {
        let mut config = Config::default();
        config.api.timeout_secs = 4;
        config.contact.business_name = "Ply Depot".to_string();

        let options = pipeline_options(&config);
        assert_eq!(options.endpoint, config.api.endpoint);
        assert_eq!(options.timeout, Duration::from_secs(4));
        assert_eq!(options.cache_ttl, Duration::from_secs(300));
        assert_eq!(options.contact.business_name, "Ply Depot");
        assert_eq!(options.contact.phone, "919876543210");
    }
}
