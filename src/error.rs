use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The generation provider call failed or the envelope carried an
    /// explicit error field. `raw` is the provider payload, passed through
    /// untouched for diagnostic display.
    #[error("generation request failed")]
    Generation { raw: serde_json::Value },

    /// The provider call succeeded but its content could not be parsed or
    /// validated as a course batch. `raw` is the offending text.
    #[error("malformed generation output: {reason}")]
    MalformedOutput { reason: String, raw: String },

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    InternalServerError,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, raw) = match self {
            AppError::Generation { raw } => (
                StatusCode::BAD_GATEWAY,
                "Generation request failed".to_string(),
                Some(raw),
            ),
            AppError::MalformedOutput { reason, raw } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                reason,
                Some(serde_json::Value::String(raw)),
            ),
            AppError::Upstream(e) => {
                error!("upstream request failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream request failed".to_string(),
                    None,
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
            raw,
        });

        (status, body).into_response()
    }
}
