//! Static frontend serving with extension-based MIME lookup.

use std::path::{Component, Path, PathBuf};

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tokio::fs;
use tracing::warn;

use crate::AppState;

/// GET / — serve the HTML entry point, with a plain-text fallback when the
/// file is missing so a bare deployment still answers something.
pub async fn serve_index(State(state): State<AppState>) -> Response {
    match fs::read(state.static_dir.join("index.html")).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            bytes,
        )
            .into_response(),
        Err(_) => (
            StatusCode::OK,
            "gigboard is running, but no index.html was found in the static directory",
        )
            .into_response(),
    }
}

/// Fallback route: serve a file from the static root.
///
/// Only GET is answered. Paths that try to escape the serve root are
/// rejected with 403 before any filesystem access.
pub async fn serve_static(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Response {
    let rel = uri.path().trim_start_matches('/');

    // Unknown API paths answer in the API's JSON envelope instead of
    // falling through to file lookup.
    if rel.starts_with("api/") || rel == "api" {
        return (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({ "ok": false, "error": "not found" })),
        )
            .into_response();
    }

    if method != Method::GET {
        return StatusCode::NOT_FOUND.into_response();
    }

    if rel.is_empty() || rel == "index.html" {
        return serve_index(State(state)).await;
    }

    let Some(path) = resolve(&state.static_dir, rel) else {
        warn!(path = %rel, "static: traversal attempt rejected");
        return StatusCode::FORBIDDEN.into_response();
    };

    match fs::read(&path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, mime_for_path(&path))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "static: read failed");
            }
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Join `rel` under `root`, rejecting any component that could escape it.
fn resolve(root: &Path, rel: &str) -> Option<PathBuf> {
    let rel = Path::new(rel);
    for component in rel.components() {
        match component {
            Component::Normal(_) => {}
            _ => return None,
        }
    }
    Some(root.join(rel))
}

/// Extension-based MIME lookup for static responses. Text formats carry a
/// charset; unknown extensions are served as a download.
fn mime_for_path(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "txt" | "md" => "text/plain; charset=utf-8",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        _ => "application/octet-stream",
    }
}
