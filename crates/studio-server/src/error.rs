use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use studio_service::ServiceError;

/// Application-level error type for HTTP handlers
///
/// Wraps [`ServiceError`] and adds request-parsing failures. Produces
/// `{"error": ..., "code": ...}` bodies; details of 5xx errors are logged and
/// replaced by a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A service-level error
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A malformed request body or query string
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Service(err) => match err {
                ServiceError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                ServiceError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                ServiceError::Render(_) => (StatusCode::BAD_REQUEST, "RENDER_ERROR", err.to_string()),
                ServiceError::Store(inner) => {
                    tracing::error!(error = %inner, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
                ServiceError::Completion(inner) => {
                    tracing::error!(error = %inner, "Completion service error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "COMPLETION_ERROR",
                        "The completion service request failed".to_string(),
                    )
                }
                ServiceError::CompletionUnavailable => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "COMPLETION_UNAVAILABLE",
                    err.to_string(),
                ),
                ServiceError::Configuration(msg) | ServiceError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
