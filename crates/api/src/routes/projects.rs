//! Route definitions for the public `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET  /            -> list_projects (active only)
/// GET  /{id}        -> get_project
/// POST /{id}/view   -> record_view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list_projects))
        .route("/{id}", get(projects::get_project))
        .route("/{id}/view", post(projects::record_view))
}
