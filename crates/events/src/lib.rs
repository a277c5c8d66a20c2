//! Ready4U notification delivery.
//!
//! This crate provides:
//!
//! - [`delivery`] -- outbound channels (SMTP email, WhatsApp via Twilio)
//!   behind the [`EmailSender`] and [`WhatsAppSender`] traits.
//! - [`OutboxDispatcher`] -- background service that drains the
//!   `notification_outbox` table with retries.

pub mod delivery;
pub mod dispatcher;

pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::whatsapp::{WhatsAppConfig, WhatsAppDelivery};
pub use delivery::{DeliveryError, EmailSender, Senders, WhatsAppSender};
pub use dispatcher::{DispatchSummary, DispatcherConfig, OutboxDispatcher};
