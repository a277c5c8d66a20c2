//! Admin management of stored email templates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ready4u_core::error::CoreError;
use ready4u_core::template::{default_request_received, EmailTemplate, TEMPLATE_REQUEST_RECEIVED};
use ready4u_db::repositories::EmailTemplateRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// A template as shown to admins.
#[derive(Debug, Serialize)]
pub struct TemplateView {
    pub key: String,
    #[serde(flatten)]
    pub template: EmailTemplate,
    /// `true` when nothing is stored and the built-in template applies.
    pub is_default: bool,
    /// Whether the stored content has the tokens needed to be used.
    pub is_usable: bool,
}

/// Only keys with a built-in default can be edited.
fn ensure_known_key(key: &str) -> AppResult<()> {
    if key == TEMPLATE_REQUEST_RECEIVED {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Email template",
            key: key.to_string(),
        }))
    }
}

/// GET /api/v1/admin/email-templates/{key}
///
/// The stored template, or the built-in default when none is stored.
pub async fn get_template(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<TemplateView>>> {
    ensure_known_key(&key)?;
    let view = match EmailTemplateRepo::find(&state.pool, &key).await? {
        Some(row) => {
            let template = row.into_template();
            TemplateView {
                key,
                is_usable: template.is_usable(),
                template,
                is_default: false,
            }
        }
        None => TemplateView {
            key,
            template: default_request_received(),
            is_default: true,
            is_usable: true,
        },
    };
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/admin/email-templates/{key}
pub async fn put_template(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(key): Path<String>,
    Json(input): Json<EmailTemplate>,
) -> AppResult<Json<DataResponse<TemplateView>>> {
    ensure_known_key(&key)?;
    input.validate_for_save().map_err(AppError::validation)?;

    let row = EmailTemplateRepo::upsert(&state.pool, &key, &input).await?;
    let template = row.into_template();
    if !template.is_usable() {
        tracing::warn!(key = %key, "Saved template lacks required tokens, the default will be used");
    }
    tracing::info!(key = %key, admin_id = admin.user_id, "Email template saved");

    Ok(Json(DataResponse {
        data: TemplateView {
            key,
            is_usable: template.is_usable(),
            template,
            is_default: false,
        },
    }))
}

/// DELETE /api/v1/admin/email-templates/{key}
///
/// Remove the stored template so the default applies again.
pub async fn delete_template(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    ensure_known_key(&key)?;
    let removed = EmailTemplateRepo::delete(&state.pool, &key).await?;
    tracing::info!(key = %key, removed, admin_id = admin.user_id, "Email template reset to default");
    Ok(StatusCode::NO_CONTENT)
}
