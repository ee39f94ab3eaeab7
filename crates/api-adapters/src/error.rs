//! Domain taxonomy to HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use domains::DomainError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Missing, malformed, or expired bearer token.
    #[error("authentication required")]
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Domain(err) => {
                let status = match err {
                    DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                    DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                    DomainError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                    DomainError::Conflict(_) => StatusCode::CONFLICT,
                    DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                // Internal details stay in the logs, not the response.
                if status == StatusCode::INTERNAL_SERVER_ERROR {
                    tracing::error!(error = %err, "internal error");
                    (status, "internal server error".to_string())
                } else {
                    (status, err.to_string())
                }
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
