//! End-to-end behaviour of the edge router.

use std::time::Duration;

use axum::http::{header, StatusCode};
use region_edge::EdgeServer;

mod common;
use common::{body_text, send, spawn_edge, test_config, BASE};

#[tokio::test]
async fn test_redirects_into_referrer_region() {
    let app = EdgeServer::new(test_config()).router();

    let res = send(
        &app,
        &format!("app.{BASE}"),
        "/foo?x=1",
        Some(format!("https://app.ca.{BASE}/").as_str()),
    )
    .await;

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        format!("https://app.ca.{BASE}/foo?x=1")
    );
    assert!(res.headers().contains_key("x-request-id"));
    assert!(body_text(res).await.is_empty());
}

#[tokio::test]
async fn test_matching_region_renders_page() {
    let app = EdgeServer::new(test_config()).router();

    let res = send(
        &app,
        &format!("app.ca.{BASE}"),
        "/",
        Some(format!("https://app.ca.{BASE}/bar").as_str()),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-content-type-options").unwrap(), "nosniff");
    let html = body_text(res).await;
    assert!(html.contains("Platform: app"));
    assert!(html.contains("Region: ca"));
}

#[tokio::test]
async fn test_no_referrer_renders_page() {
    let app = EdgeServer::new(test_config()).router();

    let res = send(&app, &format!("admin.{BASE}"), "/", None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let html = body_text(res).await;
    assert!(html.contains("Platform: admin"));
    assert!(html.contains("Region: (none)"));
}

#[tokio::test]
async fn test_empty_referrer_is_absent() {
    let app = EdgeServer::new(test_config()).router();

    let res = send(&app, &format!("app.{BASE}"), "/", Some("")).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_referrer_fails_open() {
    let app = EdgeServer::new(test_config()).router();

    let res = send(&app, &format!("app.{BASE}"), "/", Some("not a url at all")).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_forwarded_proto_sets_location_scheme() {
    let app = EdgeServer::new(test_config()).router();

    let request = axum::http::Request::builder()
        .uri("/foo")
        .header(header::HOST, format!("app.{BASE}:8787"))
        .header("x-forwarded-proto", "http")
        .header(header::REFERER, format!("http://app.ca.{BASE}:8787/"))
        .body(axum::body::Body::empty())
        .unwrap();
    let res = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        format!("http://app.ca.{BASE}:8787/foo")
    );
}

#[tokio::test]
async fn test_two_label_suffix_deployment() {
    let mut config = test_config();
    config.hosts.suffix_labels = 2;
    let app = EdgeServer::new(config).router();

    let res = send(&app, "app.example.com", "/foo", Some("https://app.ca.example.com/")).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(header::LOCATION).unwrap(),
        "https://app.ca.example.com/foo"
    );

    let res = send(&app, "app.example.com", "/", Some("https://app.example.com/")).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_stats_track_outcomes() {
    let server = EdgeServer::new(test_config());
    let app = server.router();

    send(&app, &format!("app.{BASE}"), "/", Some(format!("https://app.ca.{BASE}/").as_str())).await;
    send(&app, &format!("app.{BASE}"), "/", None).await;

    let stats = server.state().stats.snapshot();
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.redirects, 1);
    assert_eq!(stats.renders, 1);
    assert_eq!(stats.rejected, 0);
}

#[tokio::test]
async fn test_live_server_and_reload() {
    let (addr, shutdown, updates) = spawn_edge(test_config()).await;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap();

    // An IP host carries no facets, so even a regional referrer renders the page.
    let res = client
        .get(format!("http://{addr}/"))
        .header(reqwest::header::REFERER, format!("https://app.ca.{BASE}/"))
        .send()
        .await
        .expect("edge unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert!(res.text().await.unwrap().contains("<h1>Hello World!</h1>"));

    let mut reloaded = test_config();
    reloaded.page.title = "Reloaded".into();
    updates.send(reloaded).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let body = client
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("<h1>Reloaded</h1>"));

    shutdown.trigger();
}
