//! Request classification for the offline worker

use reqwest::Url;

use crate::request::AssetRequest;

/// How a request is served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Third-party content: network, cache fallback, never stored
    Bypass,
    /// Documents: network, store a copy afterwards, cache fallback
    NetworkFirst,
    /// Static assets: cache, then network with store on 200 GET
    CacheFirst,
}

/// Pick a strategy for `request` given the page origin and script-delivery hosts
pub fn classify(request: &AssetRequest, origin: &Url, bypass_hosts: &[String]) -> Strategy {
    let host = request.url.host_str().unwrap_or_default();
    if bypass_hosts.iter().any(|h| host.contains(h.as_str())) {
        return Strategy::Bypass;
    }
    // Other cross-origin traffic (the catalog API, image hosts) is never cached either.
    if request.url.origin() != origin.origin() {
        return Strategy::Bypass;
    }

    let path = request.url.path();
    if path == "/" || path.ends_with(".html") {
        Strategy::NetworkFirst
    } else {
        Strategy::CacheFirst
    }
}
