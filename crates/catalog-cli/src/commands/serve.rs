use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_config::Config;
use catalog_offline::{CacheStorage, HttpNetwork, OfflineWorker, WorkerConfig};
use reqwest::Url;
use tracing::warn;

pub fn worker_config(config: &Config) -> Result<WorkerConfig> {
    let offline = &config.offline;
    let origin = Url::parse(&offline.origin)
        .with_context(|| format!("Invalid [offline] origin: {}", offline.origin))?;

    Ok(WorkerConfig {
        cache_name: offline.cache_name.clone(),
        precache: offline.precache.clone(),
        bypass_hosts: offline.bypass_hosts.clone(),
        ..WorkerConfig::new(origin)
    })
}

pub async fn handle(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.offline.host.clone());
    let port = port.unwrap_or(config.offline.port);

    let network = HttpNetwork::new(config.api.timeout())?;
    let mut worker = OfflineWorker::new(worker_config(config)?, network, CacheStorage::new());

    // Without a worker every request is passed straight through
    if worker.register().await.is_err() {
        warn!("Serving without offline cache");
    }

    println!(
        "Proxying {} on http://{}:{}",
        worker.config().origin,
        host,
        port
    );
    catalog_offline::server::serve(Arc::new(worker), &host, port).await?;

    Ok(())
}
