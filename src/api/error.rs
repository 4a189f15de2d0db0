//! The toast-style error envelope. Domain failures carry a user-facing
//! message the client shows verbatim; infrastructure failures are logged
//! and collapsed into a generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A business-rule rejection with a message for the player.
    #[error("{0}")]
    Domain(String),
    #[error("missing or invalid X-Character-Id header")]
    Identity,
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Domain(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Identity => (
                StatusCode::UNAUTHORIZED,
                "missing or invalid X-Character-Id header".to_string(),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found.".to_string()),
            ApiError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "Not found.".to_string())
            }
            ApiError::Database(e) => {
                tracing::error!(target: "api.error", error = ?e, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong on our side. Try again.".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
