use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Upstream rejected credentials: {0}")]
    UpstreamAuth(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed generation: {0}")]
    MalformedGeneration(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, validation_message(&err)),
            Error::UpstreamAuth(detail) => {
                tracing::error!(%detail, "AI provider rejected credentials");
                (
                    StatusCode::BAD_GATEWAY,
                    "Invalid AI provider API key".to_string(),
                )
            }
            Error::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            Error::Transport(err) => {
                tracing::error!(error = ?err, "AI provider transport failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI provider is unreachable".to_string(),
                )
            }
            Error::MalformedGeneration(reason) => {
                tracing::error!(%reason, "Generated content failed validation");
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to parse quiz format".to_string(),
                )
            }
            Error::Persistence(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Database(err) => {
                tracing::error!(error = ?err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            Error::Config(msg) | Error::Internal(msg) => {
                tracing::error!(%msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}

/// First field-level message, falling back to the full error listing.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
