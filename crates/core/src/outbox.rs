//! Notification outbox status values and retry schedule.

use chrono::Duration;

pub const OUTBOX_PENDING: &str = "pending";
pub const OUTBOX_SENT: &str = "sent";
pub const OUTBOX_FAILED: &str = "failed";

pub const VALID_OUTBOX_STATUSES: &[&str] = &[OUTBOX_PENDING, OUTBOX_SENT, OUTBOX_FAILED];

/// Delay before the first retry.
const BASE_RETRY_SECS: i64 = 30;

/// Upper bound on any single retry delay.
const MAX_RETRY_SECS: i64 = 3600;

/// Delay before retrying a message that has failed `attempts` times.
pub fn retry_delay(attempts: i32) -> Duration {
    let exp = attempts.saturating_sub(1).clamp(0, 16) as u32;
    let secs = BASE_RETRY_SECS.saturating_mul(1_i64 << exp).min(MAX_RETRY_SECS);
    Duration::seconds(secs)
}

/// Whether a message that has failed `attempts` times should stop retrying.
pub fn exhausted(attempts: i32, max_attempts: i32) -> bool {
    attempts >= max_attempts
}
