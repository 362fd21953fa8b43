//! Error types for the HTTP surface and the submission store

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients
#[derive(Error, Debug)]
pub enum AppError {
    /// Client data failed a precondition (400)
    #[error("{0}")]
    InvalidInput(String),

    /// Filesystem or unexpected failure (500)
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Errors raised while persisting or reading submissions
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize submission: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("corrupt log file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("log file {} does not hold a JSON array", .path.display())]
    NotAnArray { path: PathBuf },

    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::InvalidUserId(_) => AppError::InvalidInput(message),
            _ => AppError::Internal(message),
        }
    }
}
