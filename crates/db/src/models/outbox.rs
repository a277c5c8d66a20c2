//! Notification outbox model.

use ready4u_core::messages::{NotificationKind, OutgoingMessage};
use ready4u_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notification_outbox` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutboxMessage {
    pub id: DbId,
    pub request_id: Option<DbId>,
    pub kind: String,
    pub channel: String,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
    pub status: String,
    pub attempts: i32,
    pub next_attempt_at: Timestamp,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
}

/// A message to enqueue.
#[derive(Debug, Clone)]
pub struct NewOutboxMessage {
    pub request_id: Option<DbId>,
    pub kind: String,
    pub channel: String,
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
}

impl NewOutboxMessage {
    pub fn from_outgoing(
        request_id: DbId,
        kind: NotificationKind,
        message: OutgoingMessage,
    ) -> Self {
        Self {
            request_id: Some(request_id),
            kind: kind.as_str().to_string(),
            channel: message.channel.to_string(),
            recipient: message.recipient,
            subject: message.subject,
            body: message.body,
        }
    }
}

/// Query parameters for the admin outbox listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutboxFilter {
    pub status: Option<String>,
    pub request_id: Option<DbId>,
}
