//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceExt;

use region_edge::config::EdgeConfig;
use region_edge::lifecycle::Shutdown;
use region_edge::EdgeServer;

pub const BASE: &str = "buttermilk-waffles.devon.pizza";

/// Config for in-process tests: no metrics listener, no admin listener.
pub fn test_config() -> EdgeConfig {
    let mut config = EdgeConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.observability.metrics_enabled = false;
    config
}

/// Send one request through the edge router.
#[allow(dead_code)]
pub async fn send(app: &Router, host: &str, path: &str, referer: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().uri(path).header(header::HOST, host);
    if let Some(referer) = referer {
        builder = builder.header(header::REFERER, referer);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Read a response body as UTF-8.
#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Start the edge on an ephemeral port.
///
/// Returns the bound address, the shutdown coordinator and the sender used
/// to push reloaded configs.
#[allow(dead_code)]
pub async fn spawn_edge(config: EdgeConfig) -> (SocketAddr, Shutdown, mpsc::UnboundedSender<EdgeConfig>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates_tx, updates_rx) = mpsc::unbounded_channel();
    let server = EdgeServer::new(config);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown, updates_tx)
}
