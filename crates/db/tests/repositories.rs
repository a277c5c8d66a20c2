use assert_matches::assert_matches;
use ready4u_core::project::ProjectCounter;
use ready4u_core::request_status::{PaymentStatus, RequestState, RequestStatus};
use ready4u_db::models::outbox::{NewOutboxMessage, OutboxFilter};
use ready4u_db::models::profile::SaveProfile;
use ready4u_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use ready4u_db::models::request::{NewRequest, RequestFilter, StateWrite};
use ready4u_db::models::user::CreateUser;
use ready4u_db::repositories::{
    EmailTemplateRepo, OutboxRepo, ProfileRepo, ProjectRepo, RequestRepo, SettingsRepo, UserRepo,
};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_project(pool: &PgPool, name: &str, price: i64) -> i64 {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            category: "web".to_string(),
            price,
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

fn new_request(code: &str, project_id: i64, user_id: i64) -> NewRequest {
    NewRequest {
        request_code: code.to_string(),
        project_id,
        project_name: "Chat App".to_string(),
        user_id,
        user_name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        whatsapp: "9876543210".to_string(),
        college_name: Some("IIT".to_string()),
        message: None,
        amount: 500,
    }
}

// ---------------------------------------------------------------------------
// Users and profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_create_makes_empty_profile(pool: PgPool) {
    let id = seed_user(&pool, "asha@example.com").await;

    let profile = ProfileRepo::find(&pool, id).await.unwrap().unwrap();
    assert_eq!(profile.email, "asha@example.com");
    assert!(!profile.profile_completed);
    assert!(!profile.is_complete());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_hits_unique_constraint(pool: PgPool) {
    seed_user(&pool, "asha@example.com").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            email: "asha@example.com".to_string(),
            password_hash: "h".to_string(),
            role: "user".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_users_email")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_upsert_completes_and_merges(pool: PgPool) {
    let id = seed_user(&pool, "asha@example.com").await;
    let save = SaveProfile {
        name: " Asha ".to_string(),
        phone: "9876543210".to_string(),
        college_name: "IIT".to_string(),
    };

    let profile = ProfileRepo::upsert(&pool, id, "other@example.com", &save)
        .await
        .unwrap();
    assert_eq!(profile.name, "Asha");
    assert_eq!(profile.email, "asha@example.com");
    assert!(profile.is_complete());
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_views_increment_exactly_n_times(pool: PgPool) {
    let id = seed_project(&pool, "Chat App", 500).await;
    for _ in 0..7 {
        assert!(ProjectRepo::increment_counter(&pool, id, ProjectCounter::Views, 1)
            .await
            .unwrap());
    }
    let project = ProjectRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(project.views, 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_view_increments_are_not_lost(pool: PgPool) {
    let id = seed_project(&pool, "Chat App", 500).await;
    let mut handles = Vec::new();
    for _ in 0..20 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            ProjectRepo::increment_counter(&pool, id, ProjectCounter::Views, 1)
                .await
                .unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    let project = ProjectRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(project.views, 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counter_on_missing_project_reports_false(pool: PgPool) {
    let updated = ProjectRepo::increment_counter(&pool, 9999, ProjectCounter::Requests, 1)
        .await
        .unwrap();
    assert!(!updated);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_hides_inactive_unless_asked(pool: PgPool) {
    let active = seed_project(&pool, "Active", 100).await;
    let hidden = seed_project(&pool, "Hidden", 100).await;
    ProjectRepo::update(
        &pool,
        hidden,
        &UpdateProject {
            status: Some("inactive".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let public = ProjectRepo::list(&pool, &ProjectFilter::default()).await.unwrap();
    assert_eq!(public.iter().map(|p| p.id).collect::<Vec<_>>(), vec![active]);

    let all = ProjectRepo::list(
        &pool,
        &ProjectFilter {
            include_inactive: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_only_touches_given_fields(pool: PgPool) {
    let id = seed_project(&pool, "Chat App", 800).await;
    let updated = ProjectRepo::update(
        &pool,
        id,
        &UpdateProject {
            discounted_price: Some(Some(500)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Chat App");
    assert_eq!(updated.price, 800);
    assert_eq!(updated.effective_price(), 500);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_is_hard(pool: PgPool) {
    let id = seed_project(&pool, "Chat App", 500).await;
    assert!(ProjectRepo::delete(&pool, id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(!ProjectRepo::delete(&pool, id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_starts_pending_not_paid(pool: PgPool) {
    let user = seed_user(&pool, "asha@example.com").await;
    let project = seed_project(&pool, "Chat App", 500).await;

    let mut tx = pool.begin().await.unwrap();
    let req = RequestRepo::insert(&mut tx, &new_request("REQ-2026-0001", project, user))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(req.state().unwrap(), RequestState::SUBMITTED);
    assert!(!req.download_enabled);
    assert_eq!(req.amount, 500);

    let found = RequestRepo::find_by_code(&pool, "REQ-2026-0001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, req.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_request_code_rejected(pool: PgPool) {
    let user = seed_user(&pool, "asha@example.com").await;
    let project = seed_project(&pool, "Chat App", 500).await;

    let mut tx = pool.begin().await.unwrap();
    RequestRepo::insert(&mut tx, &new_request("REQ-2026-0001", project, user))
        .await
        .unwrap();
    let err = RequestRepo::insert(&mut tx, &new_request("REQ-2026-0001", project, user))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some(ready4u_db::repositories::request_repo::REQUEST_CODE_CONSTRAINT)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_write_state_derives_download_flag(pool: PgPool) {
    let user = seed_user(&pool, "asha@example.com").await;
    let project = seed_project(&pool, "Chat App", 500).await;

    let mut tx = pool.begin().await.unwrap();
    let req = RequestRepo::insert(&mut tx, &new_request("REQ-2026-0002", project, user))
        .await
        .unwrap();
    let locked = RequestRepo::lock_by_id(&mut tx, req.id).await.unwrap().unwrap();
    assert_eq!(locked.id, req.id);

    let approved = RequestRepo::write_state(
        &mut tx,
        req.id,
        RequestState::new(RequestStatus::Approved, PaymentStatus::Verified),
        &StateWrite {
            transaction_id: Some("TXN1"),
            set_verified_at: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(approved.download_enabled);
    assert_eq!(approved.transaction_id.as_deref(), Some("TXN1"));
    assert!(approved.verified_at.is_some());

    let rejected = RequestRepo::write_state(
        &mut tx,
        req.id,
        RequestState::new(RequestStatus::Rejected, PaymentStatus::Rejected),
        &StateWrite {
            rejection_reason: Some("mismatch"),
            set_rejected_at: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert!(!rejected.download_enabled);
    assert_eq!(rejected.payment_status, "rejected");
    assert!(rejected.rejected_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_request_filters(pool: PgPool) {
    let a = seed_user(&pool, "a@example.com").await;
    let b = seed_user(&pool, "b@example.com").await;
    let project = seed_project(&pool, "Chat App", 500).await;

    let mut tx = pool.begin().await.unwrap();
    RequestRepo::insert(&mut tx, &new_request("REQ-2026-0010", project, a))
        .await
        .unwrap();
    RequestRepo::insert(&mut tx, &new_request("REQ-2026-0011", project, b))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mine = RequestRepo::list_by_user(&pool, a).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].request_code, "REQ-2026-0010");

    let by_user = RequestRepo::list(
        &pool,
        &RequestFilter {
            user_id: Some(b),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_user.len(), 1);

    let verified = RequestRepo::list(
        &pool,
        &RequestFilter {
            payment_status: Some("verified".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(verified.is_empty());

    let facts = RequestRepo::list_facts(&pool).await.unwrap();
    assert_eq!(facts.len(), 2);
    assert_matches!(facts[0].clone().into_facts(), Ok(f) if f.payment_status == PaymentStatus::NotPaid);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_record_sale_adds_amount(pool: PgPool) {
    let project = seed_project(&pool, "Chat App", 500).await;
    ProjectRepo::record_sale(&pool, project, 500).await.unwrap();
    let p = ProjectRepo::find_by_id(&pool, project).await.unwrap().unwrap();
    assert_eq!(p.sales, 1);
    assert_eq!(p.revenue, 500);
}

// ---------------------------------------------------------------------------
// Outbox
// ---------------------------------------------------------------------------

async fn enqueue_one(pool: &PgPool) -> i64 {
    let mut tx = pool.begin().await.unwrap();
    let id = OutboxRepo::enqueue(
        &mut tx,
        &NewOutboxMessage {
            request_id: None,
            kind: "request_received".to_string(),
            channel: "email".to_string(),
            recipient: "asha@example.com".to_string(),
            subject: Some("Hi".to_string()),
            body: "<p>Hi</p>".to_string(),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_claimed_messages_are_leased(pool: PgPool) {
    let id = enqueue_one(&pool).await;

    let first = OutboxRepo::claim_due(&pool, 10, 300.0).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, id);

    let second = OutboxRepo::claim_due(&pool, 10, 300.0).await.unwrap();
    assert!(second.is_empty(), "leased message must not be claimed twice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_outbox_settlement(pool: PgPool) {
    let id = enqueue_one(&pool).await;

    OutboxRepo::mark_retry(&pool, id, "timeout", chrono::Utc::now())
        .await
        .unwrap();
    let msg = OutboxRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(msg.attempts, 1);
    assert_eq!(msg.status, "pending");
    assert_eq!(msg.last_error.as_deref(), Some("timeout"));

    OutboxRepo::mark_failed(&pool, id, "gave up").await.unwrap();
    let failed = OutboxRepo::list(
        &pool,
        &OutboxFilter {
            status: Some("failed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].attempts, 2);

    let reset = OutboxRepo::reset_failed(&pool, id).await.unwrap().unwrap();
    assert_eq!(reset.status, "pending");
    assert_eq!(reset.attempts, 0);
    assert!(OutboxRepo::reset_failed(&pool, id).await.unwrap().is_none());

    OutboxRepo::mark_sent(&pool, id).await.unwrap();
    let sent = OutboxRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(sent.status, "sent");
    assert!(sent.sent_at.is_some());
}

// ---------------------------------------------------------------------------
// Templates and settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_upsert_and_delete(pool: PgPool) {
    let key = ready4u_core::template::TEMPLATE_REQUEST_RECEIVED;
    assert!(EmailTemplateRepo::find(&pool, key).await.unwrap().is_none());

    let mut t = ready4u_core::template::default_request_received();
    EmailTemplateRepo::upsert(&pool, key, &t).await.unwrap();
    t.subject = "Changed".to_string();
    let row = EmailTemplateRepo::upsert(&pool, key, &t).await.unwrap();
    assert_eq!(row.subject, "Changed");
    assert_eq!(row.into_template(), t);

    assert!(EmailTemplateRepo::delete(&pool, key).await.unwrap());
    assert!(EmailTemplateRepo::find(&pool, key).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_merge_is_shallow(pool: PgPool) {
    SettingsRepo::merge(&pool, &serde_json::json!({"upi_id": "shop@upi", "a": 1}))
        .await
        .unwrap();
    let merged = SettingsRepo::merge(&pool, &serde_json::json!({"a": 2}))
        .await
        .unwrap();
    assert_eq!(merged.settings, serde_json::json!({"upi_id": "shop@upi", "a": 2}));
}
