//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that take part in a
//! caller-owned transaction accept `&mut Transaction` or any `PgExecutor`.

pub mod email_template_repo;
pub mod outbox_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod request_repo;
pub mod settings_repo;
pub mod user_repo;

pub use email_template_repo::EmailTemplateRepo;
pub use outbox_repo::OutboxRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use request_repo::RequestRepo;
pub use settings_repo::SettingsRepo;
pub use user_repo::UserRepo;
