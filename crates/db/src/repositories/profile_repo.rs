//! Repository for the `user_profiles` table.

use ready4u_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{SaveProfile, UserProfile};

const COLUMNS: &str =
    "user_id, name, email, phone, college_name, profile_completed, created_at, updated_at";

/// Provides per-user profile reads and upserts.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Create an empty, incomplete profile. No-op if one already exists.
    pub async fn create_empty<'e, E>(executor: E, user_id: DbId, email: &str) -> Result<(), sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO user_profiles (user_id, email)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(email)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn find(pool: &PgPool, user_id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE user_id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Save the owner's profile and mark it completed.
    ///
    /// Merge semantics: the row is created if missing, otherwise only the
    /// submitted fields are replaced. A previously stored email is kept.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        email: &str,
        input: &SaveProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles (user_id, email, name, phone, college_name, profile_completed)
             VALUES ($1, $2, $3, $4, $5, TRUE)
             ON CONFLICT (user_id) DO UPDATE SET
                email = COALESCE(NULLIF(user_profiles.email, ''), EXCLUDED.email),
                name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                college_name = EXCLUDED.college_name,
                profile_completed = TRUE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(user_id)
            .bind(email)
            .bind(input.name.trim())
            .bind(input.phone.trim())
            .bind(input.college_name.trim())
            .fetch_one(pool)
            .await
    }
}
