//! Domain logic for the Ready4U project marketplace.
//!
//! Everything in this crate is pure: no database access, no network I/O.
//! The `db`, `events`, and `api` crates build on these types and rules.

pub mod analytics;
pub mod channels;
pub mod error;
pub mod messages;
pub mod outbox;
pub mod phone;
pub mod profile;
pub mod project;
pub mod request_code;
pub mod request_status;
pub mod roles;
pub mod template;
pub mod types;
