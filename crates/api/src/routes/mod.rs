pub mod admin;
pub mod auth;
pub mod health;
pub mod legacy;
pub mod profile;
pub mod projects;
pub mod requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                     signup (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current identity (requires auth)
///
/// /profile                                         get, save own profile
///
/// /projects                                        public catalog
/// /projects/{id}                                   project detail
/// /projects/{id}/view                              count a view
///
/// /requests                                        submit (requires auth)
/// /requests/mine                                   own requests
/// /requests/track/{request_code}                   public tracking
/// /requests/{id}/download                          download link once verified
/// /requests/{id}/payment-submitted                 owner reports payment
///
/// /admin/...                                       see [`admin::router`]
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/projects", projects::router())
        .nest("/requests", requests::router())
        .nest("/admin", admin::router())
}
