//! Admin settings document.

use axum::extract::State;
use axum::Json;
use ready4u_db::models::settings::AdminSettings;
use ready4u_db::repositories::SettingsRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/settings
pub async fn get_settings(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<AdminSettings>>> {
    let settings = SettingsRepo::get(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/admin/settings
///
/// Merge the given keys into the stored document.
pub async fn put_settings(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(patch): Json<serde_json::Value>,
) -> AppResult<Json<DataResponse<AdminSettings>>> {
    if !patch.is_object() {
        return Err(AppError::validation("Settings must be a JSON object"));
    }
    let settings = SettingsRepo::merge(&state.pool, &patch).await?;
    tracing::info!(admin_id = admin.user_id, "Admin settings updated");
    Ok(Json(DataResponse { data: settings }))
}
