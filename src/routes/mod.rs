//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the JSON API under `/api` and serves the single-page frontend
//! as static files from the assets directory. Every user action on the
//! page maps to exactly one of these endpoints.

pub mod api;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/session", post(api::create_session))
        .route("/api/session/{id}", get(api::get_session))
        .route("/api/session/{id}/clean", post(api::clean))
        .route("/api/session/{id}/chart", post(api::chart))
        .route("/api/session/{id}/insight", post(api::insight))
        .route("/api/sample", get(api::sample))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Resolve the directory holding the static single page.
fn assets_dir() -> PathBuf {
    std::env::var("ASSETS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
}

/// Full application router: API + static page fallback.
#[must_use]
pub fn app(state: AppState) -> Router {
    let page = ServeDir::new(assets_dir()).append_index_html_on_directories(true);
    api_routes(state)
        .fallback_service(page)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
