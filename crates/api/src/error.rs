use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use welfare_core::error::CoreError;
use welfare_db::gateway::GatewayError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for local validation and [`GatewayError`] for data
/// service failures. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => internal(msg),
            },

            // --- GatewayError variants ---
            AppError::Gateway(gateway) => match gateway {
                GatewayError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                GatewayError::InvalidRequest(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                GatewayError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                GatewayError::Backend(msg) => {
                    tracing::error!(error = %msg, "Data service error");
                    (
                        StatusCode::BAD_GATEWAY,
                        "BACKEND_ERROR",
                        "The data service failed the request".to_string(),
                    )
                }
                GatewayError::Unavailable(msg) => {
                    tracing::warn!(error = %msg, "Data service unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "SERVICE_UNAVAILABLE",
                        "The data service is unavailable".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal(msg: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %msg, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
