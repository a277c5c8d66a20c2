use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profile`. All require auth.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(profile::get_profile).put(profile::save_profile))
}
