//! Dashboard analytics.

use axum::extract::State;
use axum::Json;
use ready4u_core::analytics::{compute, Analytics};
use ready4u_db::repositories::{ProjectRepo, RequestRepo};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/analytics
///
/// Recomputed from every request row on each call.
pub async fn get_analytics(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Analytics>>> {
    let total_projects = ProjectRepo::count(&state.pool).await?;
    let facts = RequestRepo::list_facts(&state.pool)
        .await?
        .into_iter()
        .map(|row| row.into_facts())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DataResponse {
        data: compute(total_projects, facts),
    }))
}
