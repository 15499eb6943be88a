use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned for any 500 that carries no caller-safe summary of its own.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

#[derive(Error, Debug)]
pub enum NimbusError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Upstream provider error: {0}")]
    Upstream(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl NimbusError {
    pub fn status(&self) -> StatusCode {
        match self {
            NimbusError::NotFound(_) => StatusCode::NOT_FOUND,
            NimbusError::Validation(_) | NimbusError::InvalidId(_) => StatusCode::BAD_REQUEST,
            NimbusError::Database(_)
            | NimbusError::Upstream(_)
            | NimbusError::Http(_)
            | NimbusError::Json(_)
            | NimbusError::Config(_)
            | NimbusError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message a caller is allowed to see. Server-side failures collapse
    /// to a generic summary; the detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            NimbusError::NotFound(msg) | NimbusError::Validation(msg) => msg.clone(),
            NimbusError::InvalidId(_) => "Invalid ID format.".to_string(),
            _ => INTERNAL_MESSAGE.to_string(),
        }
    }

    /// Replace the generic 500 summary with an operation-specific one, leaving
    /// client errors untouched.
    pub fn with_summary(self, summary: &'static str) -> SummarizedError {
        SummarizedError {
            error: self,
            summary,
        }
    }
}

impl IntoResponse for NimbusError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        error_body(status, self.public_message())
    }
}

/// A [`NimbusError`] paired with the summary shown to the caller when the
/// error turns out to be server-side.
#[derive(Debug)]
pub struct SummarizedError {
    error: NimbusError,
    summary: &'static str,
}

impl From<NimbusError> for SummarizedError {
    fn from(error: NimbusError) -> Self {
        Self {
            error,
            summary: INTERNAL_MESSAGE,
        }
    }
}

impl IntoResponse for SummarizedError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            tracing::error!(error = %self.error, "{}", self.summary);
            return error_body(status, self.summary.to_string());
        }
        error_body(status, self.error.public_message())
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    let body = Json(json!({
        "error": message,
        "code": status.as_u16()
    }));

    (status, body).into_response()
}

pub type Result<T> = std::result::Result<T, NimbusError>;
