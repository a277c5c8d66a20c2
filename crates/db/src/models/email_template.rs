//! Stored email template rows.

use ready4u_core::template::EmailTemplate;
use ready4u_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `email_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmailTemplateRow {
    pub key: String,
    pub subject: String,
    pub content: String,
    pub whatsapp_support: String,
    pub email_support: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EmailTemplateRow {
    pub fn into_template(self) -> EmailTemplate {
        EmailTemplate {
            subject: self.subject,
            content: self.content,
            whatsapp_support: self.whatsapp_support,
            email_support: self.email_support,
        }
    }
}
