//! Request lifecycle: submission and state transitions.
//!
//! Every write here runs in one transaction together with its side effects:
//! the project counters it touches and the outbox rows for the requester's
//! notifications. The dispatcher is woken only after the commit.

use ready4u_core::error::CoreError;
use ready4u_core::messages::{build_messages, NotificationKind, RequestContext};
use ready4u_core::project::{ProjectCounter, PROJECT_STATUS_ACTIVE};
use ready4u_core::request_code::{generate_request_code, MAX_CODE_ATTEMPTS};
use ready4u_core::request_status::Transition;
use ready4u_core::template::{resolve_request_received, EmailTemplate, TEMPLATE_REQUEST_RECEIVED};
use ready4u_core::types::{DbId, Rupees};
use ready4u_db::models::email_template::EmailTemplateRow;
use ready4u_db::models::outbox::NewOutboxMessage;
use ready4u_db::models::request::{NewRequest, PurchaseRequest, StateWrite};
use ready4u_db::repositories::request_repo::REQUEST_CODE_CONSTRAINT;
use ready4u_db::repositories::{
    EmailTemplateRepo, OutboxRepo, ProfileRepo, ProjectRepo, RequestRepo,
};
use ready4u_db::DbPool;
use serde::Deserialize;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// The `requestData` object a client submits.
///
/// Contact fields left out fall back to the requester's saved profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    pub project_id: Option<DbId>,
    /// Kept loose so a missing or `null` amount gets its own message.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
    pub college_name: Option<String>,
    pub message: Option<String>,
}

/// Parse the submitted amount into whole rupees.
pub fn parse_amount(raw: Option<&serde_json::Value>) -> AppResult<Rupees> {
    let value = match raw {
        None | Some(serde_json::Value::Null) => {
            return Err(AppError::BadRequest(
                "Amount is required to submit a request".into(),
            ))
        }
        Some(v) => v,
    };
    match value.as_i64() {
        Some(amount) if amount >= 0 => Ok(amount),
        _ => Err(AppError::validation(
            "Amount must be a non-negative whole number of rupees",
        )),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Create a request for `user` and queue the request-received messages.
///
/// The request row, the project's `requests` counter, and the outbox rows
/// are committed together. A request code collision rolls back and retries
/// with a fresh code.
pub async fn submit_request(
    state: &AppState,
    user: &AuthUser,
    data: RequestData,
) -> AppResult<PurchaseRequest> {
    submit_request_with(state, user, data, generate_request_code).await
}

/// [`submit_request`] with the request code source supplied by the caller.
///
/// `next_code` is called once per attempt, at most [`MAX_CODE_ATTEMPTS`] times.
pub async fn submit_request_with(
    state: &AppState,
    user: &AuthUser,
    data: RequestData,
    mut next_code: impl FnMut() -> String,
) -> AppResult<PurchaseRequest> {
    let amount = parse_amount(data.amount.as_ref())?;

    let profile = ProfileRepo::find(&state.pool, user.user_id)
        .await?
        .filter(|p| p.is_complete())
        .ok_or_else(|| {
            AppError::validation("Please complete your profile before submitting a request")
        })?;

    let project_id = data
        .project_id
        .ok_or_else(|| AppError::validation("A project is required to submit a request"))?;
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .filter(|p| p.status == PROJECT_STATUS_ACTIVE)
        .ok_or_else(|| AppError::not_found("Project", project_id))?;

    let price = project.effective_price();
    if amount != price {
        return Err(AppError::validation(format!(
            "Amount {amount} does not match the project price {price}"
        )));
    }

    let phone = non_blank(data.phone.as_deref()).unwrap_or_else(|| profile.phone.clone());
    let base = NewRequest {
        request_code: String::new(),
        project_id: project.id,
        project_name: project.name.clone(),
        user_id: user.user_id,
        user_name: non_blank(data.user_name.as_deref()).unwrap_or_else(|| profile.name.clone()),
        email: non_blank(data.email.as_deref())
            .or_else(|| non_blank(Some(&profile.email)))
            .unwrap_or_else(|| user.email.clone()),
        whatsapp: non_blank(data.whatsapp.as_deref()).unwrap_or_else(|| phone.clone()),
        phone,
        college_name: non_blank(data.college_name.as_deref())
            .or_else(|| non_blank(Some(&profile.college_name))),
        message: non_blank(data.message.as_deref()),
        amount,
    };

    let template = load_request_template(&state.pool).await?;

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let input = NewRequest {
            request_code: next_code(),
            ..base.clone()
        };

        let mut tx = state.pool.begin().await?;
        let request = match RequestRepo::insert(&mut tx, &input).await {
            Ok(request) => request,
            Err(e) if is_unique_violation(&e, REQUEST_CODE_CONSTRAINT) => {
                tracing::warn!(
                    attempt,
                    request_code = %input.request_code,
                    "Request code already taken, generating another",
                );
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if !ProjectRepo::increment_counter(&mut *tx, project.id, ProjectCounter::Requests, 1).await? {
            return Err(AppError::not_found("Project", project.id));
        }
        enqueue_notification(&mut tx, &request, NotificationKind::RequestReceived, &template)
            .await?;
        tx.commit().await?;

        state.wake_dispatcher();
        tracing::info!(
            request_id = request.id,
            request_code = %request.request_code,
            project_id = project.id,
            user_id = user.user_id,
            amount,
            "Purchase request submitted",
        );
        return Ok(request);
    }

    Err(AppError::Core(CoreError::Conflict(
        "Could not allocate a unique request code, please try again".into(),
    )))
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Who is asking for a transition.
#[derive(Debug, Clone, Copy)]
pub enum Actor {
    Admin,
    /// The requester; the request must belong to this user.
    Owner(DbId),
}

/// Admin-supplied fields accompanying a transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionFields<'a> {
    pub transaction_id: Option<&'a str>,
    pub reason: Option<&'a str>,
}

/// Apply `transition` to a request under its row lock.
///
/// The previous payment status is read under the lock, so concurrent
/// approvals notify and count the sale exactly once.
pub async fn apply_transition(
    state: &AppState,
    request_id: DbId,
    transition: Transition,
    actor: Actor,
    fields: TransitionFields<'_>,
) -> AppResult<PurchaseRequest> {
    let transaction_id = fields.transaction_id.map(str::trim).filter(|t| !t.is_empty());
    let reason = fields.reason.map(str::trim).filter(|r| !r.is_empty());
    if transition == Transition::Approve && transaction_id.is_none() {
        return Err(AppError::validation(
            "A transaction id is required to approve a payment",
        ));
    }

    // Loaded before the row lock so the transaction holds the only connection.
    let template = load_request_template(&state.pool).await?;

    let mut tx = state.pool.begin().await?;
    let current = RequestRepo::lock_by_id(&mut tx, request_id)
        .await?
        .ok_or_else(|| AppError::not_found("Request", request_id))?;

    if let Actor::Owner(user_id) = actor {
        if current.user_id != user_id {
            return Err(AppError::Core(CoreError::Forbidden(
                "This request belongs to another user".into(),
            )));
        }
    }

    let outcome = current.state()?.apply(transition)?;

    let write = match transition {
        Transition::Approve => StateWrite {
            transaction_id,
            set_verified_at: outcome.changed,
            ..Default::default()
        },
        Transition::Reject => StateWrite {
            rejection_reason: reason,
            set_rejected_at: outcome.changed,
            ..Default::default()
        },
        Transition::DetailsSent | Transition::PaymentSubmitted => StateWrite::default(),
    };
    let updated = RequestRepo::write_state(&mut tx, request_id, outcome.next, &write).await?;

    if outcome.records_sale
        && !ProjectRepo::record_sale(&mut *tx, updated.project_id, updated.amount).await?
    {
        tracing::warn!(
            request_id,
            project_id = updated.project_id,
            "Verified request refers to a deleted project, sale not counted",
        );
    }

    if let Some(kind) = outcome.notification {
        enqueue_notification(&mut tx, &updated, kind, &template).await?;
    }

    tx.commit().await?;

    if outcome.notification.is_some() {
        state.wake_dispatcher();
    }
    tracing::info!(
        request_id,
        request_code = %updated.request_code,
        ?transition,
        status = %updated.status,
        payment_status = %updated.payment_status,
        changed = outcome.changed,
        "Request state updated",
    );
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The stored request-received template when usable, else the default.
pub async fn load_request_template(pool: &DbPool) -> Result<EmailTemplate, sqlx::Error> {
    let stored = EmailTemplateRepo::find(pool, TEMPLATE_REQUEST_RECEIVED)
        .await?
        .map(EmailTemplateRow::into_template);
    Ok(resolve_request_received(stored))
}

/// Queue the email and WhatsApp messages for `kind` in the caller's transaction.
async fn enqueue_notification(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    request: &PurchaseRequest,
    kind: NotificationKind,
    template: &EmailTemplate,
) -> Result<(), sqlx::Error> {
    let ctx = RequestContext {
        user_name: &request.user_name,
        project_name: &request.project_name,
        request_code: &request.request_code,
        amount: request.amount,
        email: &request.email,
        whatsapp: &request.whatsapp,
        reason: request.rejection_reason.as_deref(),
    };
    for message in build_messages(kind, &ctx, template) {
        let row = NewOutboxMessage::from_outgoing(request.id, kind, message);
        OutboxRepo::enqueue(tx, &row).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_or_null_amount_is_a_bad_request() {
        assert_matches!(parse_amount(None), Err(AppError::BadRequest(msg)) if msg.contains("Amount is required"));
        assert_matches!(
            parse_amount(Some(&serde_json::Value::Null)),
            Err(AppError::BadRequest(_))
        );
    }

    #[test]
    fn amount_must_be_whole_rupees() {
        assert_eq!(parse_amount(Some(&json!(500))).unwrap(), 500);
        assert_matches!(
            parse_amount(Some(&json!(499.5))),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            parse_amount(Some(&json!("500"))),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            parse_amount(Some(&json!(-1))),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn request_data_reads_camel_case() {
        let data: RequestData = serde_json::from_value(json!({
            "projectId": 7,
            "amount": 500,
            "userName": "Asha",
            "collegeName": "IIT"
        }))
        .unwrap();
        assert_eq!(data.project_id, Some(7));
        assert_eq!(data.user_name.as_deref(), Some("Asha"));
        assert_eq!(data.college_name.as_deref(), Some("IIT"));
        assert!(data.whatsapp.is_none());
    }

    #[test]
    fn blank_strings_are_treated_as_missing() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(Some(" x ")), Some("x".to_string()));
        assert_eq!(non_blank(None), None);
    }
}
