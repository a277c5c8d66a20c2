//! Admin view of the notification outbox.

use axum::extract::{Path, Query, State};
use axum::Json;
use ready4u_core::error::CoreError;
use ready4u_core::outbox::VALID_OUTBOX_STATUSES;
use ready4u_core::types::DbId;
use ready4u_db::models::outbox::{OutboxFilter, OutboxMessage};
use ready4u_db::repositories::OutboxRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/outbox
pub async fn list_outbox(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<OutboxFilter>,
) -> AppResult<Json<DataResponse<Vec<OutboxMessage>>>> {
    if let Some(status) = filter.status.as_deref() {
        if !VALID_OUTBOX_STATUSES.contains(&status) {
            return Err(AppError::validation(format!(
                "Invalid outbox status '{status}'. Must be one of: {}",
                VALID_OUTBOX_STATUSES.join(", ")
            )));
        }
    }
    let messages = OutboxRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/admin/outbox/{id}/retry
///
/// Requeue a failed message with a fresh attempt budget.
pub async fn retry_message(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OutboxMessage>>> {
    let message = match OutboxRepo::reset_failed(&state.pool, id).await? {
        Some(m) => m,
        None => {
            return Err(match OutboxRepo::find_by_id(&state.pool, id).await? {
                Some(m) => AppError::Core(CoreError::Conflict(format!(
                    "Only failed messages can be retried (message is {})",
                    m.status
                ))),
                None => AppError::not_found("Outbox message", id),
            })
        }
    };

    state.wake_dispatcher();
    tracing::info!(outbox_id = id, admin_id = admin.user_id, "Outbox message requeued");
    Ok(Json(DataResponse { data: message }))
}
