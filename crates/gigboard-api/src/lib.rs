//! # gigboard-api
//!
//! HTTP front door for gigboard: routes the REST API to the project store
//! and serves the static frontend. Everything here is glue; the
//! persistence contract lives in `gigboard-store`.

pub mod handlers;
pub mod static_files;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use gigboard_store::ProjectStore;

/// Cap on inbound request bodies. Create payloads are a few hundred bytes;
/// anything near this limit is garbage.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub static_dir: PathBuf,
}

/// Assemble the full router: API routes, middleware stack, static
/// fallback.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route("/api/projects/:id", delete(handlers::delete_project))
        .route("/api/reset", post(handlers::reset_projects))
        .route("/api/health", get(handlers::health))
        .route("/", get(static_files::serve_index))
        .fallback(static_files::serve_static)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
