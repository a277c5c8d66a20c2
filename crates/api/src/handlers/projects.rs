//! Handlers for the project catalog: public browsing and admin management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ready4u_core::error::CoreError;
use ready4u_core::project::{
    validate_counter_delta, validate_pricing, validate_project_status, ProjectCounter,
    PROJECT_STATUS_ACTIVE,
};
use ready4u_core::types::DbId;
use ready4u_db::models::project::{
    CreateProject, Project, ProjectFilter, PublicProject, UpdateProject,
};
use ready4u_db::repositories::ProjectRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for the public listing.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// Request body for `POST /admin/projects/{id}/stats`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatsRequest {
    pub field: String,
    #[serde(default = "default_delta")]
    pub delta: i64,
}

fn default_delta() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct ViewRecorded {
    pub id: DbId,
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
///
/// Active projects, newest first, optionally narrowed to one category.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<CatalogQuery>,
) -> AppResult<Json<DataResponse<Vec<PublicProject>>>> {
    let filter = ProjectFilter {
        category: params.category.filter(|c| !c.trim().is_empty()),
        include_inactive: false,
    };
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse {
        data: projects.into_iter().map(PublicProject::from).collect(),
    }))
}

/// GET /api/v1/projects/{id}
///
/// Inactive projects are hidden from the public.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PublicProject>>> {
    let project = find_active(&state, id).await?;
    Ok(Json(DataResponse {
        data: project.into(),
    }))
}

/// POST /api/v1/projects/{id}/view
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ViewRecorded>>> {
    if !ProjectRepo::increment_counter(&state.pool, id, ProjectCounter::Views, 1).await? {
        return Err(AppError::not_found("Project", id));
    }
    Ok(Json(DataResponse {
        data: ViewRecorded { id },
    }))
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects
///
/// Every project including inactive ones, with counters and download links.
pub async fn admin_list_projects(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<CatalogQuery>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let filter = ProjectFilter {
        category: params.category.filter(|c| !c.trim().is_empty()),
        include_inactive: true,
    };
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/admin/projects/{id}
pub async fn admin_get_project(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/admin/projects
pub async fn create_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::validation("Project name is required"));
    }
    validate_pricing(input.price, input.discounted_price)?;
    if let Some(status) = input.status.as_deref() {
        validate_project_status(status)?;
    }

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, admin_id = admin.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// PUT /api/v1/admin/projects/{id}
///
/// Partial update; pricing is validated against the merged values. A
/// `null` on a nullable field clears it.
pub async fn update_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;

    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Project name must not be blank"));
    }
    validate_pricing(
        input.price.unwrap_or(existing.price),
        input.merged_discount(existing.discounted_price),
    )?;
    if let Some(status) = input.status.as_deref() {
        validate_project_status(status)?;
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    tracing::info!(project_id = id, admin_id = admin.user_id, "Project updated");

    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/admin/projects/{id}
///
/// Hard delete. Requests keep their copy of the project name.
pub async fn delete_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ProjectRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Project", id));
    }
    tracing::info!(project_id = id, admin_id = admin.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/projects/{id}/stats
///
/// Atomically add `delta` to one counter.
pub async fn update_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatsRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let counter: ProjectCounter = input.field.parse()?;
    validate_counter_delta(input.delta)?;

    if !ProjectRepo::increment_counter(&state.pool, id, counter, input.delta).await? {
        return Err(AppError::not_found("Project", id));
    }
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_active(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.status == PROJECT_STATUS_ACTIVE)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}
