//! Generation, style profiles and prompt logs over HTTP

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with_completion, get, post_json};
use serde_json::json;

#[tokio::test]
async fn generate_logs_the_prompt() {
    let app = build_test_app_with_completion(Some("A finished draft."));

    let response = post_json(
        app.clone(),
        "/api/generate",
        json!({
            "template_id": "1",
            "values": {
                "content_type": "case study",
                "target_audience": "engineers",
                "content_style_profile_id": "4"
            }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["result"], "A finished draft.");
    assert_eq!(json["logged"], true);
    assert_eq!(json["usage"]["input_tokens"], 20);
    assert!(json["prompt"].as_str().unwrap().starts_with("Draft a case study for engineers"));

    let logs = body_json(get(app.clone(), "/api/prompt-logs").await).await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(
        logs[0]["prompt_object"]["variables"]["content_style_profile"]["industry"],
        "construction"
    );
    assert_eq!(logs[0]["result_tokens"], 5);

    let template = body_json(get(app, "/api/templates/1").await).await;
    assert_eq!(template["usage_count"], 1);
}

#[tokio::test]
async fn generate_without_provider_is_503() {
    let response = post_json(
        build_test_app(),
        "/api/generate",
        json!({ "template": "Hello {{name}}" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "COMPLETION_UNAVAILABLE");
}

#[tokio::test]
async fn generate_upstream_failure_is_502() {
    let response = post_json(
        build_test_app_with_completion(None),
        "/api/generate",
        json!({ "template": "Hello" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "COMPLETION_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("upstream unavailable"));
}

#[tokio::test]
async fn generate_rejects_unrenderable_template() {
    let response = post_json(
        build_test_app_with_completion(Some("unused")),
        "/api/generate",
        json!({ "template": "{{#each items}}never closed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "RENDER_ERROR");
}

#[tokio::test]
async fn generate_requires_a_template() {
    let response = post_json(
        build_test_app_with_completion(Some("unused")),
        "/api/generate",
        json!({ "values": {} }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn style_profiles_are_listed() {
    let json = body_json(get(build_test_app(), "/api/style-profiles").await).await;
    let profiles = json.as_array().unwrap();
    assert_eq!(profiles.len(), 4);
    assert_eq!(profiles[0]["name"], "Professional");
    assert_eq!(profiles[3]["json_payload"]["industry"], "construction");
}

#[tokio::test]
async fn prompt_logs_limit_must_be_numeric() {
    let response = get(build_test_app(), "/api/prompt-logs?limit=many").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(build_test_app(), "/api/prompt-logs?limit=5").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}
