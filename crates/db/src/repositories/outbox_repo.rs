//! Repository for the `notification_outbox` table.

use ready4u_core::outbox::{OUTBOX_FAILED, OUTBOX_PENDING, OUTBOX_SENT};
use ready4u_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::outbox::{NewOutboxMessage, OutboxFilter, OutboxMessage};

const COLUMNS: &str = "id, request_id, kind, channel, recipient, subject, body, status, \
    attempts, next_attempt_at, last_error, created_at, sent_at";

/// Upper bound on rows returned by the admin listing.
const LIST_LIMIT: i64 = 500;

/// Provides the notification outbox: enqueue inside a state-change
/// transaction, then claim and settle from the dispatcher.
pub struct OutboxRepo;

impl OutboxRepo {
    /// Queue a message as part of the caller's transaction.
    pub async fn enqueue(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        msg: &NewOutboxMessage,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notification_outbox (request_id, kind, channel, recipient, subject, body)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(msg.request_id)
        .bind(&msg.kind)
        .bind(&msg.channel)
        .bind(&msg.recipient)
        .bind(&msg.subject)
        .bind(&msg.body)
        .fetch_one(&mut **tx)
        .await
    }

    /// Claim up to `limit` due messages.
    ///
    /// Claimed rows have `next_attempt_at` pushed `lease_secs` into the
    /// future so concurrent dispatchers skip them; a crash mid-delivery makes
    /// them due again once the lease expires.
    pub async fn claim_due(
        pool: &PgPool,
        limit: i64,
        lease_secs: f64,
    ) -> Result<Vec<OutboxMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE notification_outbox
             SET next_attempt_at = NOW() + make_interval(secs => $2)
             WHERE id IN (
                SELECT id FROM notification_outbox
                WHERE status = '{OUTBOX_PENDING}' AND next_attempt_at <= NOW()
                ORDER BY next_attempt_at, id
                LIMIT $1
                FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, OutboxMessage>(&query)
            .bind(limit)
            .bind(lease_secs)
            .fetch_all(pool)
            .await?;
        rows.sort_by_key(|m| m.id);
        Ok(rows)
    }

    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE notification_outbox
             SET status = '{OUTBOX_SENT}', attempts = attempts + 1, sent_at = NOW(),
                 last_error = NULL
             WHERE id = $1"
        );
        sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(())
    }

    /// Record a failed attempt and schedule the next one.
    pub async fn mark_retry(
        pool: &PgPool,
        id: DbId,
        error: &str,
        next_attempt_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_outbox
             SET attempts = attempts + 1, last_error = $2, next_attempt_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .bind(next_attempt_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a final failed attempt.
    pub async fn mark_failed(pool: &PgPool, id: DbId, error: &str) -> Result<(), sqlx::Error> {
        let query = format!(
            "UPDATE notification_outbox
             SET status = '{OUTBOX_FAILED}', attempts = attempts + 1, last_error = $2
             WHERE id = $1"
        );
        sqlx::query(&query).bind(id).bind(error).execute(pool).await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OutboxMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_outbox WHERE id = $1");
        sqlx::query_as::<_, OutboxMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first, optionally filtered by status or request.
    pub async fn list(pool: &PgPool, filter: &OutboxFilter) -> Result<Vec<OutboxMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_outbox
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::BIGINT IS NULL OR request_id = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT {LIST_LIMIT}"
        );
        sqlx::query_as::<_, OutboxMessage>(&query)
            .bind(&filter.status)
            .bind(filter.request_id)
            .fetch_all(pool)
            .await
    }

    /// Put a failed message back in the queue with a fresh attempt budget.
    ///
    /// Returns `None` if the message does not exist or is not failed.
    pub async fn reset_failed(pool: &PgPool, id: DbId) -> Result<Option<OutboxMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE notification_outbox
             SET status = '{OUTBOX_PENDING}', attempts = 0, next_attempt_at = NOW(),
                 last_error = NULL
             WHERE id = $1 AND status = '{OUTBOX_FAILED}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboxMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
