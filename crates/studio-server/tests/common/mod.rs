#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header::CONTENT_TYPE};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use studio_llm::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionResponse, Message,
    StopReason, TokenUsage,
};
use studio_server::{AppState, ServerConfig, build_app_router};
use studio_service::{ServiceConfig, StudioService};
use studio_store::MemoryBackend;

/// Completion provider echoing a fixed reply, or failing when `reply` is `None`
pub struct CannedProvider {
    pub reply: Option<String>,
}

#[async_trait]
impl CompletionProvider for CannedProvider {
    async fn complete(&self, _request: CompletionRequest) -> studio_llm::Result<CompletionResponse> {
        match &self.reply {
            Some(text) => Ok(CompletionResponse {
                message: Message::assistant(text.clone()),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 20,
                    output_tokens: 5,
                },
            }),
            None => Err(CompletionError::RequestFailed("upstream unavailable".to_string())),
        }
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// Test `ServerConfig` with local defaults
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
    }
}

/// Application over the seeded memory backend with no completion provider
pub fn build_test_app() -> Router {
    let service = StudioService::new(Arc::new(MemoryBackend::seeded()), ServiceConfig::default());
    build_app_router(AppState::new(service, test_config()), &test_config())
}

/// Application whose completion provider returns `reply` (or fails on `None`)
pub fn build_test_app_with_completion(reply: Option<&str>) -> Router {
    let provider = CannedProvider {
        reply: reply.map(str::to_string),
    };
    let service = StudioService::new(Arc::new(MemoryBackend::seeded()), ServiceConfig::default())
        .with_completion(Arc::new(provider));
    let state = AppState::new(service, test_config()).with_api_key("sk-test-0123456789");
    build_app_router(state, &test_config())
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Read the whole body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
