//! Admin settings document.

use ready4u_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// The single `admin_settings` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminSettings {
    pub settings: serde_json::Value,
    pub updated_at: Timestamp,
}
