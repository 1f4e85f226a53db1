use axum::Json;
use axum::extract::State;
use serde::Serialize;
use studio_store::BackendMode;

use crate::state::AppState;

/// Environment status payload
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub backend: BackendMode,
    pub completion: CompletionStatus,
}

#[derive(Debug, Serialize)]
pub struct CompletionStatus {
    pub configured: bool,
    pub provider: Option<String>,
    pub model: String,
    /// Masked key, never the key itself
    pub api_key: Option<String>,
}

/// GET /api/status
///
/// Which persistence backend is active and whether generation is available.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let service = &state.service;

    Json(StatusResponse {
        backend: service.backend_mode(),
        completion: CompletionStatus {
            configured: service.completion_name().is_some(),
            provider: service.completion_name().map(str::to_string),
            model: service.config().model.clone(),
            api_key: state.api_key_hint.clone(),
        },
    })
}
