//! Local caching proxy: every request goes through `OfflineWorker::handle_fetch`

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header::HOST},
    response::{IntoResponse, Response},
};
use reqwest::Url;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::Result;
use crate::network::Network;
use crate::request::{AssetRequest, AssetResponse};
use crate::worker::OfflineWorker;

// Recomputed by the server for the proxied body.
const HOP_BY_HOP: [&str; 4] = ["connection", "transfer-encoding", "content-length", "keep-alive"];

/// Router that answers every path via the worker
pub fn router<N: Network + 'static>(worker: Arc<OfflineWorker<N>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback(proxy::<N>)
        .layer(cors)
        .with_state(worker)
}

pub async fn serve<N: Network + 'static>(
    worker: Arc<OfflineWorker<N>>,
    host: &str,
    port: u16,
) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    info!(origin = %worker.config().origin, "Offline proxy listening on {}", addr);

    axum::serve(listener, router(worker)).await?;

    Ok(())
}

async fn proxy<N: Network + 'static>(
    State(worker): State<Arc<OfflineWorker<N>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = origin_url(&worker.config().origin, &uri);

    let mut request = AssetRequest::new(method, url).with_body(body.to_vec());
    for (name, value) in &headers {
        if *name == HOST || HOP_BY_HOP.contains(&name.as_str()) {
            continue;
        }
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }

    match worker.handle_fetch(request).await {
        Ok(asset) => into_response(asset),
        Err(err) => {
            warn!(error = %err, "Proxy request failed");
            (StatusCode::GATEWAY_TIMEOUT, err.to_string()).into_response()
        }
    }
}

/// The origin with the request's path and query. The host never comes from the request.
pub fn origin_url(origin: &Url, uri: &Uri) -> Url {
    let mut url = origin.clone();
    url.set_path(uri.path());
    url.set_query(uri.query());
    url
}

fn into_response(asset: AssetResponse) -> Response {
    let mut response = Response::new(Body::from(asset.body));
    *response.status_mut() = StatusCode::from_u16(asset.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let headers = response.headers_mut();
    for (name, value) in asset.headers {
        if HOP_BY_HOP.contains(&name.to_ascii_lowercase().as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            headers.append(name, value);
        }
    }
    response
}
