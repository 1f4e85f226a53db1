//! Template routes mounted at `/api/templates`

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use studio_service::{NewTemplate, NewVersion, PreviewRequest, TemplateFilter, TemplatePatch};
use studio_template::TemplateVariable;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// ```text
/// GET    /                 -> list_templates
/// POST   /                 -> create_template
/// POST   /analyze          -> analyze_template
/// POST   /preview          -> preview_template
/// GET    /{id}             -> get_template
/// PUT    /{id}             -> update_template
/// DELETE /{id}             -> delete_template
/// POST   /{id}/clone       -> clone_template
/// GET    /{id}/versions    -> list_versions
/// POST   /{id}/versions    -> create_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route("/analyze", post(analyze_template))
        .route("/preview", post(preview_template))
        .route(
            "/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/{id}/clone", post(clone_template))
        .route("/{id}/versions", get(list_versions).post(create_version))
}

/// GET /api/templates?search=&category=
pub async fn list_templates(
    State(state): State<AppState>,
    filter: Result<Query<TemplateFilter>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(filter) = filter?;
    let templates = state.service.list_templates(&filter).await?;
    Ok(Json(templates))
}

/// POST /api/templates
pub async fn create_template(
    State(state): State<AppState>,
    payload: Result<Json<NewTemplate>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let template = state.service.create_template(input).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/templates/{id}
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let template = state.service.get_template(&id).await?;
    Ok(Json(template))
}

/// PUT /api/templates/{id}
///
/// Partial update; omitted fields are left as they are.
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TemplatePatch>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(patch) = payload?;
    let template = state.service.update_template(&id, patch).await?;
    Ok(Json(template))
}

/// DELETE /api/templates/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.service.delete_template(&id).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Default, Deserialize)]
pub struct CloneRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /api/templates/{id}/clone
///
/// The body is optional; `{"name": ...}` overrides the default copy name.
pub async fn clone_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let request: CloneRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CloneRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };

    let copy = state.service.clone_template(&id, request.name).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// GET /api/templates/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let versions = state.service.list_versions(&id).await?;
    Ok(Json(versions))
}

/// POST /api/templates/{id}/versions
pub async fn create_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewVersion>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let version = state.service.create_version(&id, input).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default, alias = "text")]
    pub template: String,
    /// Metadata to keep for names still present
    #[serde(default)]
    pub variables: Vec<TemplateVariable>,
}

/// POST /api/templates/analyze
pub async fn analyze_template(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = payload?;
    let analysis = state
        .service
        .analyze(&request.template, &request.variables)
        .await?;
    Ok(Json(analysis))
}

/// POST /api/templates/preview
pub async fn preview_template(
    State(state): State<AppState>,
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = payload?;
    let preview = state.service.preview(request).await?;
    Ok(Json(preview))
}
