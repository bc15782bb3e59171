//! Axum HTTP handlers.

pub mod auth;
pub mod typeahead;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/typeahead/repos", get(typeahead::search_repos))
        .route("/api/typeahead/branches", get(typeahead::list_branches))
        .with_state(state)
}

/// GET /healthz - Liveness probe
async fn healthz() -> &'static str {
    "ok"
}
