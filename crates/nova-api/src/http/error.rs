//! Application error type mapping to HTTP status codes and a JSON envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use nova_types::error::ModelSwitchError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Unknown model alias.
    ModelSwitch(ModelSwitchError),
    /// Validation error.
    Validation(String),
}

impl From<ModelSwitchError> for AppError {
    fn from(e: ModelSwitchError) -> Self {
        AppError::ModelSwitch(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::ModelSwitch(e) => {
                (StatusCode::NOT_FOUND, "ALIAS_NOT_FOUND", e.to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "data": null,
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
