//! Repository for the `email_templates` table.

use ready4u_core::template::EmailTemplate;
use sqlx::PgPool;

use crate::models::email_template::EmailTemplateRow;

const COLUMNS: &str = "key, subject, content, whatsapp_support, email_support, created_at, updated_at";

/// Provides admin-editable template storage keyed by template name.
pub struct EmailTemplateRepo;

impl EmailTemplateRepo {
    pub async fn find(pool: &PgPool, key: &str) -> Result<Option<EmailTemplateRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_templates WHERE key = $1");
        sqlx::query_as::<_, EmailTemplateRow>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the template stored under `key`.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        template: &EmailTemplate,
    ) -> Result<EmailTemplateRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_templates (key, subject, content, whatsapp_support, email_support)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (key) DO UPDATE SET
                subject = EXCLUDED.subject,
                content = EXCLUDED.content,
                whatsapp_support = EXCLUDED.whatsapp_support,
                email_support = EXCLUDED.email_support
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailTemplateRow>(&query)
            .bind(key)
            .bind(&template.subject)
            .bind(&template.content)
            .bind(&template.whatsapp_support)
            .bind(&template.email_support)
            .fetch_one(pool)
            .await
    }

    /// Remove a stored template so the built-in default applies again.
    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_templates WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
