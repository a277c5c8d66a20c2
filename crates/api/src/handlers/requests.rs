//! Handlers for purchase requests: submission, tracking, downloads, and the
//! admin verification workflow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ready4u_core::error::CoreError;
use ready4u_core::request_status::{PaymentStatus, RequestStatus, Transition};
use ready4u_core::types::DbId;
use ready4u_db::models::request::{PurchaseRequest, RequestFilter, TrackedRequest};
use ready4u_db::repositories::{ProjectRepo, RequestRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::lifecycle::{apply_transition, submit_request, Actor, RequestData, TransitionFields};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::{CreateRequestResponse, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of a submission: `{ "requestData": { ... } }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub request_data: Option<RequestData>,
}

/// Request body for `POST /admin/requests/{id}/approve`.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    pub transaction_id: Option<String>,
}

/// Request body for `POST /admin/requests/{id}/reject`.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

/// Response of `GET /requests/{id}/download`.
#[derive(Debug, Serialize)]
pub struct DownloadLink {
    pub request_id: DbId,
    pub project_id: DbId,
    pub download_link: String,
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// POST /api/create-request
///
/// Returns `{ success, requestId, firestoreId }`.
pub async fn create_request_legacy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateRequestBody>,
) -> AppResult<Json<CreateRequestResponse>> {
    let data = body
        .request_data
        .ok_or_else(|| AppError::BadRequest("Missing request data".into()))?;
    let request = submit_request(&state, &user, data).await?;

    Ok(Json(CreateRequestResponse {
        success: true,
        request_id: request.request_code,
        firestore_id: request.id.to_string(),
    }))
}

/// POST /api/v1/requests
pub async fn create_request(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateRequestBody>,
) -> AppResult<(StatusCode, Json<DataResponse<PurchaseRequest>>)> {
    let data = body
        .request_data
        .ok_or_else(|| AppError::BadRequest("Missing request data".into()))?;
    let request = submit_request(&state, &user, data).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

// ---------------------------------------------------------------------------
// Requester reads and actions
// ---------------------------------------------------------------------------

/// GET /api/v1/requests/mine
pub async fn my_requests(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<PurchaseRequest>>>> {
    let requests = RequestRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/requests/track/{request_code}
///
/// Public lookup by the human-facing code, with contact details masked.
pub async fn track_request(
    State(state): State<AppState>,
    Path(request_code): Path<String>,
) -> AppResult<Json<DataResponse<TrackedRequest>>> {
    let code = request_code.trim().to_uppercase();
    let request = RequestRepo::find_by_code(&state.pool, &code)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundByKey {
            entity: "Request",
            key: code,
        }))?;
    Ok(Json(DataResponse {
        data: request.into(),
    }))
}

/// GET /api/v1/requests/{id}/download
///
/// The project's download link, for the owner or an admin, once the payment
/// is verified.
pub async fn download(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DownloadLink>>> {
    let request = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Request", id))?;

    if request.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "This request belongs to another user".into(),
        )));
    }
    if !(request.download_enabled && request.state()?.download_enabled()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Download is available once your payment is verified".into(),
        )));
    }

    let download_link = ProjectRepo::find_by_id(&state.pool, request.project_id)
        .await?
        .and_then(|p| p.download_link)
        .filter(|l| !l.trim().is_empty())
        .ok_or(AppError::Core(CoreError::NotFoundByKey {
            entity: "Download link for project",
            key: request.project_id.to_string(),
        }))?;

    tracing::info!(request_id = id, user_id = user.user_id, "Download link issued");
    Ok(Json(DataResponse {
        data: DownloadLink {
            request_id: request.id,
            project_id: request.project_id,
            download_link,
        },
    }))
}

/// POST /api/v1/requests/{id}/payment-submitted
///
/// The owner reports having paid and sent a screenshot.
pub async fn payment_submitted(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PurchaseRequest>>> {
    let request = apply_transition(
        &state,
        id,
        Transition::PaymentSubmitted,
        Actor::Owner(user.user_id),
        TransitionFields::default(),
    )
    .await?;
    Ok(Json(DataResponse { data: request }))
}

// ---------------------------------------------------------------------------
// Admin workflow
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/requests
///
/// Newest first, filtered by `status`, `payment_status`, and `user_id`.
pub async fn admin_list_requests(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<RequestFilter>,
) -> AppResult<Json<DataResponse<Vec<PurchaseRequest>>>> {
    if let Some(status) = filter.status.as_deref() {
        status.parse::<RequestStatus>()?;
    }
    if let Some(payment_status) = filter.payment_status.as_deref() {
        payment_status.parse::<PaymentStatus>()?;
    }
    let requests = RequestRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/admin/requests/{id}
pub async fn admin_get_request(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PurchaseRequest>>> {
    let request = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Request", id))?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/admin/requests/{id}/details-sent
pub async fn details_sent(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PurchaseRequest>>> {
    let request = apply_transition(
        &state,
        id,
        Transition::DetailsSent,
        Actor::Admin,
        TransitionFields::default(),
    )
    .await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/admin/requests/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveRequest>,
) -> AppResult<Json<DataResponse<PurchaseRequest>>> {
    let request = apply_transition(
        &state,
        id,
        Transition::Approve,
        Actor::Admin,
        TransitionFields {
            transaction_id: input.transaction_id.as_deref(),
            reason: None,
        },
    )
    .await?;
    tracing::info!(request_id = id, admin_id = admin.user_id, "Payment approved");
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/admin/requests/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<DataResponse<PurchaseRequest>>> {
    let request = apply_transition(
        &state,
        id,
        Transition::Reject,
        Actor::Admin,
        TransitionFields {
            transaction_id: None,
            reason: input.reason.as_deref(),
        },
    )
    .await?;
    tracing::info!(request_id = id, admin_id = admin.user_id, "Payment rejected");
    Ok(Json(DataResponse { data: request }))
}
