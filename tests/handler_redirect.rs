mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use shorty::domain::entities::ShortCode;
use shorty::domain::repositories::UrlStore;
use std::sync::Arc;

#[tokio::test]
async fn test_redirect_success() {
    let (server, store) = common::memory_server();
    store
        .save(&ShortCode::new_unchecked("abc123"), "https://example.com/target")
        .await
        .unwrap();

    let response = server.get("/api/abc123").await;

    response.assert_status(StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_shorten_then_redirect() {
    let (server, _store) = common::memory_server();

    let created = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://rust-lang.org/learn" }))
        .await
        .json::<Value>();
    let code = created["data"]["code"].as_str().unwrap();

    let response = server.get(&format!("/api/{}", code)).await;

    response.assert_status(StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header("location"), "https://rust-lang.org/learn");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (server, _store) = common::memory_server();

    let response = server.get("/api/nope42").await;

    response.assert_status_not_found();

    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["message"], "Original url not found");
}

#[tokio::test]
async fn test_redirect_code_is_case_sensitive() {
    let (server, store) = common::memory_server();
    store
        .save(&ShortCode::new_unchecked("AbCdEf"), "https://example.com")
        .await
        .unwrap();

    server
        .get("/api/AbCdEf")
        .await
        .assert_status(StatusCode::PERMANENT_REDIRECT);
    server.get("/api/abcdef").await.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_malformed_code_is_not_found() {
    // Every store call fails, so a 404 proves the store was never consulted
    let server = common::server_with_store(Arc::new(common::UnavailableStore));

    let response = server.get("/api/bad-code!").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_store_down_is_internal_error() {
    let server = common::server_with_store(Arc::new(common::UnavailableStore));

    let response = server.get("/api/abc123").await;

    response.assert_status_internal_server_error();

    let json = response.json::<Value>();
    assert_eq!(json["error"]["message"], "Something went wrong");
}

#[tokio::test]
async fn test_url_with_control_characters_still_redirects() {
    let (server, _store) = common::memory_server();

    let created = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a\nb\tc" }))
        .await;
    created.assert_status(StatusCode::CREATED);

    let code = created.json::<Value>()["data"]["code"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/api/{}", code)).await;

    response.assert_status(StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/abc");
}

#[tokio::test]
async fn test_non_ascii_url_redirects_percent_encoded() {
    let (server, _store) = common::memory_server();

    let created = server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/caf\u{e9}" }))
        .await
        .json::<Value>();
    let code = created["data"]["code"].as_str().unwrap();

    let response = server.get(&format!("/api/{}", code)).await;

    response.assert_status(StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/caf%C3%A9");
}
