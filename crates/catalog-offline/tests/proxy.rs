mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use catalog_offline::{AssetResponse, CacheStorage, server};
use common::{FakeNetwork, worker};
use tokio::net::TcpListener;

async fn spawn_proxy(network: Arc<FakeNetwork>, caches: CacheStorage) -> SocketAddr {
    let mut worker = worker(network, caches);
    worker.register().await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = server::router(Arc::new(worker));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_proxy_serves_precached_assets() {
    let network = Arc::new(FakeNetwork::site());
    let addr = spawn_proxy(network.clone(), CacheStorage::new()).await;
    let installs = network.hits("/script.js?v=2");

    let response = reqwest::get(format!("http://{}/script.js?v=2", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "fetchProducts()");
    assert_eq!(network.hits("/script.js?v=2"), installs);
}

#[tokio::test]
async fn test_proxy_forwards_status_and_headers() {
    let network = Arc::new(FakeNetwork::site());
    network.route(
        "/manifest.webmanifest",
        AssetResponse::new(200, "{\"name\":\"Ply\"}")
            .with_header("content-type", "application/manifest+json")
            .with_header("connection", "close"),
    );
    let addr = spawn_proxy(network, CacheStorage::new()).await;

    let ok = reqwest::get(format!("http://{}/manifest.webmanifest", addr))
        .await
        .unwrap();
    assert_eq!(
        ok.headers()["content-type"].to_str().unwrap(),
        "application/manifest+json"
    );

    let missing = reqwest::get(format!("http://{}/nope.png", addr)).await.unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_proxy_answers_offline_from_cache() {
    let network = Arc::new(FakeNetwork::site());
    let addr = spawn_proxy(network.clone(), CacheStorage::new()).await;
    network.set_offline(true);

    let home = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(home.status(), 200);
    assert_eq!(home.text().await.unwrap(), "<html>home</html>");

    let uncached = reqwest::get(format!("http://{}/gallery.html", addr))
        .await
        .unwrap();
    assert_eq!(uncached.status(), 504);
}

#[tokio::test]
async fn test_proxy_never_leaves_origin() {
    let network = Arc::new(FakeNetwork::site());
    network.route(
        "https://evil.example/secret",
        AssetResponse::new(200, "FROM-OTHER-HOST"),
    );
    let addr = spawn_proxy(network.clone(), CacheStorage::new()).await;

    let response = reqwest::get(format!("http://{}//evil.example/secret", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_ne!(response.text().await.unwrap(), "FROM-OTHER-HOST");

    assert_eq!(network.hits("https://evil.example/secret"), 0);
    let forwarded = network.last_request().unwrap();
    assert_eq!(forwarded.url.host_str(), Some("ply.example"));
}

#[tokio::test]
async fn test_proxy_forwards_body_and_headers() {
    let network = Arc::new(FakeNetwork::site());
    network.route("/api/enquiry", AssetResponse::new(200, "received"));
    let addr = spawn_proxy(network.clone(), CacheStorage::new()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/enquiry", addr))
        .header("if-none-match", "\"v2\"")
        .body("qty=3&part=MP-18")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let forwarded = network.last_request().unwrap();
    assert_eq!(forwarded.method, reqwest::Method::POST);
    assert_eq!(forwarded.body, b"qty=3&part=MP-18");
    assert_eq!(forwarded.header("if-none-match"), Some("\"v2\""));
    assert_eq!(forwarded.header("host"), None);
    assert_eq!(forwarded.header("content-length"), None);
}
