//! REST handlers for the project API.
//!
//! All responses are JSON envelopes: `{ok: true, ...}` on success and
//! `{ok: false, error}` on failure.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use gigboard_core::{Error, NewProject};
use gigboard_store::ProjectStore;

use crate::AppState;

/// API-facing error: a status code plus a JSON error body.
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "ok": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Log a store failure with its operation and convert it for the wire.
/// Expected conditions (bad input, unknown id) log at warn, everything
/// else at error.
fn store_err(operation: &'static str, err: Error) -> ApiError {
    match &err {
        Error::InvalidInput(_) | Error::NotFound(_) => {
            warn!(operation, error = %err, "request rejected");
        }
        _ => {
            error!(operation, error = %err, "store operation failed");
        }
    }
    err.into()
}

/// GET /api/projects
pub async fn list_projects(State(state): State<AppState>) -> Result<Response, ApiError> {
    let projects = state
        .store
        .read_all()
        .await
        .map_err(|e| store_err("list_projects", e))?;

    Ok(Json(json!({ "ok": true, "projects": projects })).into_response())
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(value) = body.map_err(|rejection| {
        warn!(status = %rejection.status(), "create_project: body rejected");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("request body too large".to_string())
        } else {
            ApiError::BadRequest("request body must be valid JSON".to_string())
        }
    })?;

    let candidate = NewProject::from_value(&value).map_err(|e| store_err("create_project", e))?;
    let project = state
        .store
        .create(candidate)
        .await
        .map_err(|e| store_err("create_project", e))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "project": project })),
    )
        .into_response())
}

/// DELETE /api/projects/:id
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state
        .store
        .delete(&id)
        .await
        .map_err(|e| store_err("delete_project", e))?;

    Ok(Json(json!({ "ok": true, "id": id })).into_response())
}

/// POST /api/reset
pub async fn reset_projects(State(state): State<AppState>) -> Result<Response, ApiError> {
    let projects = state
        .store
        .reset()
        .await
        .map_err(|e| store_err("reset_projects", e))?;

    Ok(Json(json!({
        "ok": true,
        "message": format!("store reset to {} sample projects", projects.len()),
    }))
    .into_response())
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Result<Response, ApiError> {
    let projects = state
        .store
        .read_all()
        .await
        .map_err(|e| store_err("health", e))?;

    Ok(Json(json!({
        "ok": true,
        "status": "ok",
        "projects": projects.len(),
    }))
    .into_response())
}
