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

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Upstream model API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable category rendered next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "configuration_error",
            Error::BadRequest(_) | Error::Validation(_) => "validation_error",
            Error::Upstream { .. } | Error::Reqwest(_) => "upstream_error",
            Error::Generation(_) => "generation_error",
            Error::Json(_) | Error::Anyhow(_) | Error::Internal(_) | Error::Io(_) => {
                "internal_error"
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::BadRequest(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Upstream { .. } | Error::Reqwest(_) | Error::Generation(_) => {
                StatusCode::BAD_GATEWAY
            }
            Error::Json(_) | Error::Anyhow(_) | Error::Internal(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let kind = self.kind();

        let body = match self {
            Error::Config(msg) => json!({ "error": msg, "kind": kind }),
            Error::BadRequest(msg) => json!({ "error": msg, "kind": kind }),
            Error::Validation(err) => json!({ "error": err.to_string(), "kind": kind }),
            Error::Upstream {
                status: upstream_status,
                body,
            } => json!({
                "error": format!("Question service responded with status {}", upstream_status),
                "kind": kind,
                "status": upstream_status,
                "detail": body,
            }),
            Error::Generation(msg) => json!({ "error": msg, "kind": kind }),
            Error::Reqwest(err) => json!({
                "error": format!("External service error: {}", err),
                "kind": kind,
            }),
            other => {
                tracing::error!(error = %other, "unhandled internal error");
                json!({ "error": "An unexpected error occurred", "kind": kind })
            }
        };

        (status, Json(body)).into_response()
    }
}
