//! User profile model and DTOs.

use ready4u_core::profile::is_profile_complete;
use ready4u_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_profiles` table. Keyed by the owning user id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub user_id: DbId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college_name: String,
    pub profile_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProfile {
    pub fn is_complete(&self) -> bool {
        is_profile_complete(
            self.profile_completed,
            &self.name,
            &self.phone,
            &self.college_name,
        )
    }
}

/// DTO for the owner saving their profile.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveProfile {
    pub name: String,
    pub phone: String,
    pub college_name: String,
}
