//! Health, status and general HTTP behaviour

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with_completion, get};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = get(build_test_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(build_test_app(), "/nothing-here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_request_id() {
    let response = get(build_test_app(), "/health").await;
    let request_id = response.headers().get("x-request-id");
    assert!(request_id.is_some(), "Response must contain an x-request-id header");
    assert_eq!(request_id.unwrap().to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn status_without_completion() {
    let json = body_json(get(build_test_app(), "/api/status").await).await;
    assert_eq!(json["backend"], "memory");
    assert_eq!(json["completion"]["configured"], false);
    assert!(json["completion"]["api_key"].is_null());
    assert_eq!(json["completion"]["model"], "gpt-4o");
}

#[tokio::test]
async fn status_masks_api_key() {
    let json = body_json(get(build_test_app_with_completion(Some("ok")), "/api/status").await).await;
    assert_eq!(json["completion"]["configured"], true);
    assert_eq!(json["completion"]["provider"], "canned");
    assert_eq!(json["completion"]["api_key"], "sk-...789");
}
