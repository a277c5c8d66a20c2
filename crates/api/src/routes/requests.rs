//! Route definitions for the requester-facing `/requests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// POST /                          -> create_request (requires auth)
/// GET  /mine                      -> my_requests (requires auth)
/// GET  /track/{request_code}      -> track_request (public)
/// GET  /{id}/download             -> download (owner or admin)
/// POST /{id}/payment-submitted    -> payment_submitted (owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(requests::create_request))
        .route("/mine", get(requests::my_requests))
        .route("/track/{request_code}", get(requests::track_request))
        .route("/{id}/download", get(requests::download))
        .route("/{id}/payment-submitted", post(requests::payment_submitted))
}
