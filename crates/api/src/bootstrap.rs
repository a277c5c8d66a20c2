//! Startup seeding of the first administrator.

use ready4u_core::roles::ROLE_ADMIN;
use ready4u_db::models::user::CreateUser;
use ready4u_db::repositories::UserRepo;
use ready4u_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};
use crate::handlers::auth::normalize_email;

/// What [`ensure_admin`] found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AlreadyExists,
}

/// Create the configured admin account unless the email is already taken.
///
/// An existing account is left untouched, whatever its role.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<BootstrapOutcome> {
    let email = normalize_email(&admin.email);
    if let Some(existing) = UserRepo::find_by_email(pool, &email).await? {
        if existing.role != ROLE_ADMIN {
            tracing::warn!(
                user_id = existing.id,
                role = %existing.role,
                "Bootstrap admin email belongs to a non-admin account",
            );
        }
        return Ok(BootstrapOutcome::AlreadyExists);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            password_hash,
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "Bootstrap admin created");
    Ok(BootstrapOutcome::Created)
}
