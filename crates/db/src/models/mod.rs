//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the API accepts them

pub mod email_template;
pub mod outbox;
pub mod profile;
pub mod project;
pub mod request;
pub mod settings;
pub mod user;
