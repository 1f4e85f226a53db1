pub mod generation;
pub mod health;
pub mod status;
pub mod templates;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the `/api` route tree
///
/// ```text
/// /status                        environment status
///
/// /templates                     list, create
/// /templates/analyze             detect variables (POST)
/// /templates/preview             render with form values (POST)
/// /templates/{id}                get, update, delete
/// /templates/{id}/clone          copy (POST)
/// /templates/{id}/versions       list, create
///
/// /generate                      render and submit (POST)
/// /style-profiles                list
/// /prompt-logs                   recent submissions
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::get_status))
        .nest("/templates", templates::router())
        .route("/generate", post(generation::generate))
        .route("/style-profiles", get(generation::list_style_profiles))
        .route("/prompt-logs", get(generation::list_prompt_logs))
}
