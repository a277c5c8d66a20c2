//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, analytics, outbox, projects, requests, settings, templates};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users                          -> list_users
/// POST   /users                          -> create_user
///
/// GET    /projects                       -> admin_list_projects
/// POST   /projects                       -> create_project
/// GET    /projects/{id}                  -> admin_get_project
/// PUT    /projects/{id}                  -> update_project
/// DELETE /projects/{id}                  -> delete_project
/// POST   /projects/{id}/stats            -> update_stats
///
/// GET    /requests                       -> admin_list_requests
/// GET    /requests/{id}                  -> admin_get_request
/// POST   /requests/{id}/details-sent     -> details_sent
/// POST   /requests/{id}/approve          -> approve
/// POST   /requests/{id}/reject           -> reject
///
/// GET    /outbox                         -> list_outbox
/// POST   /outbox/{id}/retry              -> retry_message
///
/// GET    /email-templates/{key}          -> get_template
/// PUT    /email-templates/{key}          -> put_template
/// DELETE /email-templates/{key}          -> delete_template
///
/// GET    /settings                       -> get_settings
/// PUT    /settings                       -> put_settings
///
/// GET    /analytics                      -> get_analytics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        // Projects.
        .route(
            "/projects",
            get(projects::admin_list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(projects::admin_get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/projects/{id}/stats", post(projects::update_stats))
        // Requests.
        .route("/requests", get(requests::admin_list_requests))
        .route("/requests/{id}", get(requests::admin_get_request))
        .route("/requests/{id}/details-sent", post(requests::details_sent))
        .route("/requests/{id}/approve", post(requests::approve))
        .route("/requests/{id}/reject", post(requests::reject))
        // Notifications.
        .route("/outbox", get(outbox::list_outbox))
        .route("/outbox/{id}/retry", post(outbox::retry_message))
        .route(
            "/email-templates/{key}",
            get(templates::get_template)
                .put(templates::put_template)
                .delete(templates::delete_template),
        )
        // Dashboard.
        .route(
            "/settings",
            get(settings::get_settings).put(settings::put_settings),
        )
        .route("/analytics", get(analytics::get_analytics))
}
