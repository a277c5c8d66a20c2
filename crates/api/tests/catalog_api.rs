//! HTTP-level integration tests for the project catalog.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_json, get, get_auth, post_json, post_json_auth, put_json_auth};
use ready4u_db::models::project::UpdateProject;
use ready4u_db::repositories::ProjectRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Public catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_listing_hides_inactive_and_download_links(pool: PgPool) {
    let visible = common::create_project(&pool, "Chat App", 500).await;
    let hidden = common::create_project(&pool, "Old App", 300).await;
    ProjectRepo::update(
        &pool,
        hidden.id,
        &UpdateProject {
            status: Some("inactive".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool);

    let json = expect_json(get(app.clone(), "/api/v1/projects").await, StatusCode::OK).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], visible.id);
    assert!(items[0].get("download_link").is_none());
    assert!(items[0].get("revenue").is_none());

    let response = get(app, &format!("/api/v1/projects/{}", hidden.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_filters_by_category(pool: PgPool) {
    common::create_project(&pool, "Chat App", 500).await;
    let app = common::build_test_app(pool);

    let json = expect_json(
        get(app.clone(), "/api/v1/projects?category=web").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = expect_json(get(app, "/api/v1/projects?category=ml").await, StatusCode::OK).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

/// Views grow by exactly one per call.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_views_increment_once_per_call(pool: PgPool) {
    let project = common::create_project(&pool, "Chat App", 500).await;
    let app = common::build_test_app(pool.clone());

    for _ in 0..5 {
        let uri = format!("/api/v1/projects/{}/view", project.id);
        let response = post_json(app.clone(), &uri, json!({})).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let stored = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(stored.views, 5);

    let response = post_json(app, "/api/v1/projects/999999/view", json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Admin management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_project_crud(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Inventory System",
        "category": "web",
        "price": 1200,
        "discounted_price": 999,
        "tech_stack": ["Rust", "Postgres"],
        "download_link": "https://files.example.com/inv.zip"
    });
    let created = expect_json(
        post_json_auth(app.clone(), "/api/v1/admin/projects", body, &token).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["status"], "active");
    assert_eq!(created["data"]["tech_stack"], json!(["Rust", "Postgres"]));

    let updated = expect_json(
        put_json_auth(
            app.clone(),
            &format!("/api/v1/admin/projects/{id}"),
            json!({ "name": "Inventory Pro", "status": "inactive" }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["data"]["name"], "Inventory Pro");
    assert_eq!(updated["data"]["price"], 1200);
    assert_eq!(updated["data"]["status"], "inactive");

    let listed = expect_json(
        get_auth(app.clone(), "/api/v1/admin/projects", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["data"][0]["download_link"], "https://files.example.com/inv.zip");

    let response = delete_auth(app.clone(), &format!("/api/v1/admin/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &format!("/api/v1/admin/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_discount_above_price_is_rejected(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let project = common::create_project(&pool, "Chat App", 500).await;
    let app = common::build_test_app(pool);

    let body = json!({ "name": "Bad", "price": 100, "discounted_price": 200 });
    let response = post_json_auth(app.clone(), "/api/v1/admin/projects", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/v1/admin/projects/{}", project.id);
    let response = put_json_auth(app, &uri, json!({ "discounted_price": 600 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_null_clears_discount_and_links(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Chat App",
        "price": 1000,
        "discounted_price": 800,
        "repo_link": "https://git.example.com/chat",
    });
    let created = expect_json(
        post_json_auth(app.clone(), "/api/v1/admin/projects", body, &token).await,
        StatusCode::CREATED,
    )
    .await;
    let uri = format!("/api/v1/admin/projects/{}", created["data"]["id"]);

    // Omitted keys are left alone.
    let json = expect_json(
        put_json_auth(app.clone(), &uri, json!({ "name": "Chat App v2" }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["discounted_price"], 800);
    assert_eq!(json["data"]["repo_link"], "https://git.example.com/chat");

    let json = expect_json(
        put_json_auth(
            app.clone(),
            &uri,
            json!({ "discounted_price": null, "repo_link": null }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert!(json["data"]["discounted_price"].is_null());
    assert!(json["data"]["repo_link"].is_null());
    assert_eq!(json["data"]["price"], 1000);

    // Lowering the price below the old discount is fine once it is cleared.
    let json = expect_json(
        put_json_auth(
            app.clone(),
            &uri,
            json!({ "price": 500, "discounted_price": null }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["price"], 500);
    assert!(json["data"]["discounted_price"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_price_drop_with_discount_cleared_in_same_patch(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let project = common::create_project(&pool, "Chat App", 1000).await;
    ProjectRepo::update(
        &pool,
        project.id,
        &UpdateProject {
            discounted_price: Some(Some(800)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/admin/projects/{}", project.id);

    // The stored discount would exceed the new price.
    let response = put_json_auth(app.clone(), &uri, json!({ "price": 500 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = expect_json(
        put_json_auth(app, &uri, json!({ "price": 500, "discounted_price": null }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["price"], 500);
    assert!(json["data"]["discounted_price"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_stats(pool: PgPool) {
    let (_admin, token) = common::admin(&pool).await;
    let project = common::create_project(&pool, "Chat App", 500).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/admin/projects/{}/stats", project.id);

    let json = expect_json(
        post_json_auth(app.clone(), &uri, json!({ "field": "revenue", "delta": 250 }), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["revenue"], 250);

    let response =
        post_json_auth(app.clone(), &uri, json!({ "field": "sales", "delta": -1 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(app, &uri, json!({ "field": "likes" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_catalog_requires_admin(pool: PgPool) {
    let (_user, token) = common::buyer(&pool, "asha@example.com").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/projects", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
