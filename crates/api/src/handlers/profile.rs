//! Handlers for the caller's own profile.

use axum::extract::State;
use axum::Json;
use ready4u_core::error::CoreError;
use ready4u_core::profile::validate_profile;
use ready4u_db::models::profile::{SaveProfile, UserProfile};
use ready4u_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let profile = ProfileRepo::find(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile", user.user_id))?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// Save name, phone, and college and mark the profile completed.
pub async fn save_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<SaveProfile>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    validate_profile(&input.name, input.phone.trim(), &input.college_name)
        .map_err(AppError::Core)?;

    let input = SaveProfile {
        name: input.name.trim().to_string(),
        phone: input.phone.trim().to_string(),
        college_name: input.college_name.trim().to_string(),
    };
    let profile = ProfileRepo::upsert(&state.pool, user.user_id, &user.email, &input).await?;
    if !profile.is_complete() {
        return Err(AppError::Core(CoreError::Internal(format!(
            "Profile for user {} saved incomplete",
            user.user_id
        ))));
    }
    tracing::info!(user_id = user.user_id, "Profile saved");

    Ok(Json(DataResponse { data: profile }))
}
