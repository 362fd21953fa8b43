//! HTTP API handlers

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{debug, error};

use crate::error::AppError;
use crate::server::ServerState;
use crate::types::{
    ImproveTextRequest, ImproveTextResponse, LogsResponse, StatusResponse, Submission,
    SubmitResponse,
};

/// Improve text handler
pub async fn improve_text_handler(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<ImproveTextResponse>, AppError> {
    let req: ImproveTextRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e)))?;

    let text = match req.text {
        Some(text) if !text.is_empty() => text,
        _ => return Err(AppError::InvalidInput("No text provided".to_string())),
    };

    debug!("Improving {} chars of text", text.chars().count());
    let improved_text = state.improver.improve(&text);

    Ok(Json(ImproveTextResponse { improved_text }))
}

/// Form submission handler
pub async fn submit_form_handler(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, AppError> {
    let submission: Submission = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid form data: {}", e)))?;

    let store = state.store.clone();
    let path = tokio::task::spawn_blocking(move || store.persist(&submission))
        .await
        .map_err(|e| AppError::Internal(format!("Submission task failed: {}", e)))?
        .map_err(|e| {
            error!("Error saving form data: {}", e);
            AppError::from(e)
        })?;

    Ok(Json(SubmitResponse {
        status: "success".to_string(),
        message: "Form data saved successfully".to_string(),
        filename: path.display().to_string(),
    }))
}

/// Aggregate log listing handler
pub async fn logs_handler(
    State(state): State<ServerState>,
) -> Result<Json<LogsResponse>, AppError> {
    let store = state.store.clone();
    let logs = tokio::task::spawn_blocking(move || store.read_all())
        .await
        .map_err(|e| AppError::Internal(format!("Log read task failed: {}", e)))??;

    Ok(Json(LogsResponse { logs }))
}

/// Status handler
pub async fn status_handler() -> impl IntoResponse {
    let response = StatusResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}
