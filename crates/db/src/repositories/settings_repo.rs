//! Repository for the single-row `admin_settings` table.

use sqlx::PgPool;

use crate::models::settings::AdminSettings;

pub struct SettingsRepo;

impl SettingsRepo {
    pub async fn get(pool: &PgPool) -> Result<AdminSettings, sqlx::Error> {
        sqlx::query_as::<_, AdminSettings>(
            "SELECT settings, updated_at FROM admin_settings WHERE id = 1",
        )
        .fetch_one(pool)
        .await
    }

    /// Shallow-merge `patch` (a JSON object) into the stored document.
    pub async fn merge(
        pool: &PgPool,
        patch: &serde_json::Value,
    ) -> Result<AdminSettings, sqlx::Error> {
        sqlx::query_as::<_, AdminSettings>(
            "UPDATE admin_settings SET settings = settings || $1
             WHERE id = 1
             RETURNING settings, updated_at",
        )
        .bind(patch)
        .fetch_one(pool)
        .await
    }
}
