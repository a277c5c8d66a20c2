use sqlx::PgPool;

/// Connect, migrate, verify the seeded rows exist.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    ready4u_db::health_check(&pool).await.unwrap();

    let settings = ready4u_db::repositories::SettingsRepo::get(&pool)
        .await
        .unwrap();
    assert_eq!(settings.settings, serde_json::json!({}));
}

/// The database refuses status pairs the service never writes.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inconsistent_state_rejected_by_schema(pool: PgPool) {
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, password_hash) VALUES ('a@x.com', 'h') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let result = sqlx::query(
        "INSERT INTO requests (request_code, project_id, project_name, user_id, user_name,
                               email, phone, whatsapp, amount, status, payment_status)
         VALUES ('REQ-2026-0001', 1, 'P', $1, 'U', 'a@x.com', '9876543210', '9876543210',
                 500, 'pending', 'verified')",
    )
    .bind(user_id)
    .execute(&pool)
    .await;

    let err = result.expect_err("inconsistent pair must be rejected");
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("ck_requests_state"));
}

/// Roles outside admin/user are refused.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_role_rejected(pool: PgPool) {
    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, role) VALUES ('a@x.com', 'h', 'superuser')",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());
}
