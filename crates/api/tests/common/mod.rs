#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::Notify;
use tower::ServiceExt;

use ready4u_api::auth::jwt::{generate_access_token, JwtConfig};
use ready4u_api::auth::password::hash_password;
use ready4u_api::config::ServerConfig;
use ready4u_api::router::build_app_router;
use ready4u_api::state::AppState;
use ready4u_core::roles::{ROLE_ADMIN, ROLE_USER};
use ready4u_db::models::profile::SaveProfile;
use ready4u_db::models::project::{CreateProject, Project};
use ready4u_db::models::user::{CreateUser, User};
use ready4u_db::repositories::{ProfileRepo, ProjectRepo, UserRepo};
use ready4u_events::{DeliveryError, EmailSender, Senders, WhatsAppSender};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        bootstrap_admin: None,
    }
}

/// Build the full application router with no notification channels.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Senders::default())
}

/// Build the full application router with the given channels.
///
/// Uses the same [`build_app_router`] as production so the middleware stack
/// is exercised.
pub fn build_test_app_with(pool: PgPool, senders: Senders) -> Router {
    build_app_router(test_state(pool, senders), &test_config())
}

/// Application state for calling lifecycle functions directly.
pub fn test_state(pool: PgPool, senders: Senders) -> AppState {
    AppState {
        pool,
        config: Arc::new(test_config()),
        senders,
        outbox_waker: Arc::new(Notify::new()),
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash,
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &user.email, &test_config().jwt)
        .expect("token generation should succeed")
}

/// An admin account and its bearer token.
pub async fn admin(pool: &PgPool) -> (User, String) {
    let user = create_user(pool, "owner@ready4u.test", ROLE_ADMIN).await;
    let token = token_for(&user);
    (user, token)
}

/// A regular account with a completed profile, and its bearer token.
pub async fn buyer(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, ROLE_USER).await;
    ProfileRepo::upsert(
        pool,
        user.id,
        &user.email,
        &SaveProfile {
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            college_name: "IIT Madras".to_string(),
        },
    )
    .await
    .expect("profile save should succeed");
    let token = token_for(&user);
    (user, token)
}

pub async fn create_project(pool: &PgPool, name: &str, price: i64) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            category: "web".to_string(),
            price,
            download_link: Some("https://files.example.com/project.zip".to_string()),
            ..Default::default()
        },
    )
    .await
    .expect("project creation should succeed")
}

// ---------------------------------------------------------------------------
// Recording senders
// ---------------------------------------------------------------------------

/// Records every email instead of sending it.
#[derive(Default)]
pub struct RecordingEmail {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl EmailSender for RecordingEmail {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), html.to_string()));
        Ok(())
    }
}

/// Records every WhatsApp message instead of sending it.
#[derive(Default)]
pub struct RecordingWhatsApp {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl WhatsAppSender for RecordingWhatsApp {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, "GET", uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, "GET", uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, "POST", uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, "POST", uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, "PUT", uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, "DELETE", uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
