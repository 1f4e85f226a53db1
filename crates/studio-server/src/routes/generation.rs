//! Generation, style profile and prompt log handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use studio_service::GenerateRequest;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/generate
///
/// Renders the template with the submitted values and sends it to the
/// completion model. Returns 503 when no model is configured.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = payload?;
    let generation = state.service.generate(request).await?;
    Ok(Json(generation))
}

/// GET /api/style-profiles
pub async fn list_style_profiles(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let profiles = state.service.style_profiles().await?;
    Ok(Json(profiles))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<usize>,
}

/// GET /api/prompt-logs?limit=
pub async fn list_prompt_logs(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) = query?;
    let logs = state.service.recent_logs(query.limit).await?;
    Ok(Json(logs))
}
