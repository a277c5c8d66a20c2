//! Unversioned `/api/*` endpoints kept for existing front-end clients.

use axum::routing::post;
use axum::Router;

use crate::handlers::{relay, requests};
use crate::state::AppState;

/// Routes merged at the root, next to `/api/v1`.
///
/// ```text
/// POST /api/create-request   -> create_request_legacy (requires auth)
/// POST /api/send-email       -> send_email (admin only)
/// POST /api/send-whatsapp    -> send_whatsapp (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/create-request", post(requests::create_request_legacy))
        .route("/api/send-email", post(relay::send_email))
        .route("/api/send-whatsapp", post(relay::send_whatsapp))
}
