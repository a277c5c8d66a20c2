//! Direct notification relays used by the admin dashboard.
//!
//! These send synchronously and report the provider's outcome; they do not
//! go through the outbox.

use axum::extract::State;
use axum::Json;
use ready4u_core::phone::to_e164;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::RelayResponse;
use crate::state::AppState;

/// Request body for `POST /api/send-email`.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub html: Option<String>,
}

/// Request body for `POST /api/send-whatsapp`.
#[derive(Debug, Deserialize)]
pub struct SendWhatsAppRequest {
    pub to: Option<String>,
    pub body: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /api/send-email
pub async fn send_email(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<SendEmailRequest>,
) -> AppResult<Json<RelayResponse>> {
    let (Some(to), Some(subject), Some(html)) =
        (present(input.to), present(input.subject), present(input.html))
    else {
        return Err(AppError::BadRequest(
            "Missing required fields: to, subject, html".into(),
        ));
    };

    state.senders.send_email(to.trim(), &subject, &html).await?;
    tracing::info!(admin_id = admin.user_id, "Relay email sent");

    Ok(Json(RelayResponse {
        success: true,
        message: format!("Email sent successfully to {}", to.trim()),
    }))
}

/// POST /api/send-whatsapp
pub async fn send_whatsapp(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<SendWhatsAppRequest>,
) -> AppResult<Json<RelayResponse>> {
    let (Some(to), Some(body)) = (present(input.to), present(input.body)) else {
        return Err(AppError::BadRequest(
            "Missing required fields: to, body".into(),
        ));
    };

    let phone = to_e164(&to)?;
    state.senders.send_whatsapp(&phone, &body).await?;
    tracing::info!(admin_id = admin.user_id, "Relay WhatsApp message sent");

    Ok(Json(RelayResponse {
        success: true,
        message: format!("WhatsApp message sent successfully to {phone}"),
    }))
}
