use std::sync::Arc;

use ready4u_events::Senders;
use tokio::sync::Notify;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ready4u_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Notification channels, used directly by the relay endpoints.
    pub senders: Senders,
    /// Wakes the outbox dispatcher after a commit that queued messages.
    pub outbox_waker: Arc<Notify>,
}

impl AppState {
    /// Ask the dispatcher to run a pass now instead of at its next tick.
    pub fn wake_dispatcher(&self) {
        self.outbox_waker.notify_one();
    }
}
