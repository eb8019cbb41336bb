mod common;

use axum::Router;
use axum::ServiceExt;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::routing::get;
use axum_test::TestServer;
use serde_json::Value;
use shorty::domain::entities::ShortCode;
use shorty::domain::repositories::UrlStore;
use shorty::infrastructure::persistence::MemoryUrlStore;
use shorty::routes::{app_router, with_middleware};
use std::sync::Arc;
use std::time::Duration;

fn full_server() -> (TestServer, Arc<MemoryUrlStore>) {
    let store = Arc::new(MemoryUrlStore::new());
    let state = common::create_test_state(store.clone());
    let app = app_router(
        state,
        concat!(env!("CARGO_MANIFEST_DIR"), "/static"),
        Duration::from_secs(5),
    );

    let server = TestServer::new(ServiceExt::<Request>::into_make_service(app)).unwrap();
    (server, store)
}

fn server_for(router: Router, timeout: Duration) -> TestServer {
    let app = with_middleware(router, timeout);
    TestServer::new(ServiceExt::<Request>::into_make_service(app)).unwrap()
}

async fn exploding_handler() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn test_serves_static_index() {
    let (server, _store) = full_server();

    let response = server.get("/static/index.html").await;

    response.assert_status_ok();
    response.assert_text_contains("/api/shorten");
}

#[tokio::test]
async fn test_missing_static_file_is_not_found() {
    let (server, _store) = full_server();

    server
        .get("/static/nope.css")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let (server, store) = full_server();
    store
        .save(&ShortCode::new_unchecked("abc123"), "https://example.com/")
        .await
        .unwrap();

    let response = server.get("/api/abc123/").await;

    response.assert_status(StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/");
}

#[tokio::test]
async fn test_health_through_full_stack() {
    let (server, _store) = full_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (server, _store) = full_server();

    let response = server.get("/health").await;

    let id = response.header("x-request-id");
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _store) = full_server();

    let response = server
        .get("/health")
        .add_header("x-request-id", "req-42")
        .await;

    assert_eq!(response.header("x-request-id"), "req-42");
}

#[tokio::test]
async fn test_panic_becomes_error_envelope() {
    let router = Router::new().route("/boom", get(exploding_handler));
    let server = server_for(router, Duration::from_secs(5));

    let response = server.get("/boom").await;

    response.assert_status_internal_server_error();

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "internal_error");
    assert_eq!(json["error"]["message"], "Something went wrong");
    assert!(response.contains_header("x-request-id"));
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "done"
        }),
    );
    let server = server_for(router, Duration::from_millis(50));

    let response = server.get("/slow").await;

    response.assert_status(StatusCode::REQUEST_TIMEOUT);
}
