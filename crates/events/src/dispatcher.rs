//! Notification outbox dispatcher.
//!
//! [`OutboxDispatcher`] runs as a background task. It wakes on a poll
//! interval or when notified after a commit, claims due outbox rows, hands
//! each to its channel, and records the outcome. Failed deliveries are
//! rescheduled with exponential backoff until the attempt budget is spent;
//! permanent failures (for example an unconfigured channel) are marked
//! `failed` straight away.

use std::sync::Arc;
use std::time::Duration;

use ready4u_core::outbox::{exhausted, retry_delay};
use ready4u_db::models::outbox::OutboxMessage;
use ready4u_db::repositories::OutboxRepo;
use ready4u_db::DbPool;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::delivery::Senders;

const DEFAULT_POLL_SECS: u64 = 5;
const DEFAULT_BATCH_SIZE: i64 = 20;
const DEFAULT_MAX_ATTEMPTS: i32 = 5;

/// How long a claimed row stays invisible to other dispatchers.
const CLAIM_LEASE_SECS: f64 = 300.0;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub poll_interval: Duration,
    pub batch_size: i64,
    pub max_attempts: i32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl DispatcherConfig {
    /// | Variable              | Default |
    /// |-----------------------|---------|
    /// | `OUTBOX_POLL_SECS`    | `5`     |
    /// | `OUTBOX_BATCH_SIZE`   | `20`    |
    /// | `OUTBOX_MAX_ATTEMPTS` | `5`     |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let poll_secs: u64 = var("OUTBOX_POLL_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_SECS);
        Self {
            poll_interval: Duration::from_secs(poll_secs),
            batch_size: var("OUTBOX_BATCH_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BATCH_SIZE),
            max_attempts: var("OUTBOX_MAX_ATTEMPTS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
        }
        .clamped()
    }

    /// Raise each setting to its smallest usable value. `drain` stops on a
    /// short batch, so the batch size must be positive.
    pub fn clamped(self) -> Self {
        Self {
            poll_interval: self.poll_interval.max(Duration::from_secs(1)),
            batch_size: self.batch_size.max(1),
            max_attempts: self.max_attempts.max(1),
        }
    }
}

// ---------------------------------------------------------------------------
// DispatchSummary
// ---------------------------------------------------------------------------

/// Outcome counts for one claimed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub retried: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn total(&self) -> usize {
        self.sent + self.retried + self.failed
    }
}

// ---------------------------------------------------------------------------
// OutboxDispatcher
// ---------------------------------------------------------------------------

pub struct OutboxDispatcher {
    pool: DbPool,
    senders: Senders,
    config: DispatcherConfig,
    wake: Arc<Notify>,
}

impl OutboxDispatcher {
    pub fn new(pool: DbPool, senders: Senders, config: DispatcherConfig) -> Self {
        Self {
            pool,
            senders,
            config: config.clamped(),
            wake: Arc::new(Notify::new()),
        }
    }

    /// Handle used to trigger an immediate pass after enqueueing.
    pub fn waker(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }

    /// Run the dispatch loop until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(
            poll_secs = self.config.poll_interval.as_secs(),
            batch_size = self.config.batch_size,
            "Outbox dispatcher started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Outbox dispatcher cancelled");
                    break;
                }
                _ = interval.tick() => {}
                _ = self.wake.notified() => {}
            }

            if let Err(e) = self.drain().await {
                tracing::error!(error = %e, "Failed to dispatch outbox messages");
            }
        }
    }

    /// Dispatch batches until one comes back short.
    async fn drain(&self) -> Result<(), sqlx::Error> {
        loop {
            let summary = self.dispatch_due().await?;
            if summary.total() > 0 {
                tracing::debug!(
                    sent = summary.sent,
                    retried = summary.retried,
                    failed = summary.failed,
                    "Outbox batch dispatched"
                );
            }
            if (summary.total() as i64) < self.config.batch_size {
                return Ok(());
            }
        }
    }

    /// Claim and deliver one batch of due messages.
    pub async fn dispatch_due(&self) -> Result<DispatchSummary, sqlx::Error> {
        let batch =
            OutboxRepo::claim_due(&self.pool, self.config.batch_size, CLAIM_LEASE_SECS).await?;

        let mut summary = DispatchSummary::default();
        for msg in &batch {
            match self.deliver_one(msg).await? {
                Settled::Sent => summary.sent += 1,
                Settled::Retry => summary.retried += 1,
                Settled::Failed => summary.failed += 1,
            }
        }
        Ok(summary)
    }

    async fn deliver_one(&self, msg: &OutboxMessage) -> Result<Settled, sqlx::Error> {
        let result = self
            .senders
            .deliver(&msg.channel, &msg.recipient, msg.subject.as_deref(), &msg.body)
            .await;

        let err = match result {
            Ok(()) => {
                OutboxRepo::mark_sent(&self.pool, msg.id).await?;
                return Ok(Settled::Sent);
            }
            Err(e) => e,
        };

        let attempts = msg.attempts + 1;
        let reason = err.to_string();

        if err.is_permanent() || exhausted(attempts, self.config.max_attempts) {
            tracing::error!(
                outbox_id = msg.id,
                request_id = ?msg.request_id,
                channel = %msg.channel,
                kind = %msg.kind,
                attempts,
                error = %err,
                "Notification delivery failed permanently"
            );
            OutboxRepo::mark_failed(&self.pool, msg.id, &reason).await?;
            return Ok(Settled::Failed);
        }

        let next = chrono::Utc::now() + retry_delay(attempts);
        tracing::warn!(
            outbox_id = msg.id,
            channel = %msg.channel,
            attempts,
            next_attempt_at = %next,
            error = %err,
            "Notification delivery failed, will retry"
        );
        OutboxRepo::mark_retry(&self.pool, msg.id, &reason, next).await?;
        Ok(Settled::Retry)
    }
}

enum Settled {
    Sent,
    Retry,
    Failed,
}
