//! HTTP handlers, grouped by resource.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod outbox;
pub mod profile;
pub mod projects;
pub mod relay;
pub mod requests;
pub mod settings;
pub mod templates;
