// API error type
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid display config: {0}")]
    InvalidConfig(String),
    #[error("invalid pointer position: {0}")]
    InvalidPointer(String),
    #[error("invalid replay: {0}")]
    InvalidReplay(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!("Rejecting request: {}", self);
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}
