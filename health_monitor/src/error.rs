//! Application error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown resource type: {0}")]
    UnknownKind(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for MonitorError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MonitorError::Validation(format!("resource with empty values: {}", errors))
    }
}

impl IntoResponse for MonitorError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            MonitorError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            MonitorError::UnknownKind(kind) => {
                (StatusCode::BAD_REQUEST, format!("Unknown resource type: {}", kind))
            }
            MonitorError::IoError(err) => {
                tracing::error!("IO error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            MonitorError::Other(err) => {
                tracing::error!("Unexpected error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

/// Failures that abort a whole check. Each one is reported to the caller as a
/// structured `ServerResponse`, never propagated as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("Nothing to check")]
    NothingToCheck,

    #[error("Timed out while checking resources")]
    Timeout,

    #[error("Generic error: {0}")]
    Generic(String),
}

impl CheckError {
    pub fn status(&self) -> u16 {
        match self {
            CheckError::NothingToCheck => 500,
            CheckError::Timeout => 503,
            CheckError::Generic(_) => 500,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CheckError::NothingToCheck => "Nothing to check",
            CheckError::Timeout => "Timed out while checking resources",
            CheckError::Generic(_) => "Generic error",
        }
    }
}
