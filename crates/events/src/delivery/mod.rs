//! External delivery channels for requester notifications.
//!
//! Each channel is a trait object so the dispatcher and the relay endpoints
//! can run against the real providers or against test doubles. A channel
//! whose configuration is absent is `None` in [`Senders`] and every send to
//! it fails permanently with [`DeliveryError::NotConfigured`].

pub mod email;
pub mod whatsapp;

use std::sync::Arc;

use async_trait::async_trait;
use ready4u_core::channels::{CHANNEL_EMAIL, CHANNEL_WHATSAPP};

use self::email::EmailError;
use self::whatsapp::WhatsAppError;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("{0} delivery is not configured")]
    NotConfigured(&'static str),

    #[error("Unknown notification channel '{0}'")]
    UnknownChannel(String),

    #[error(transparent)]
    Email(#[from] EmailError),

    #[error(transparent)]
    WhatsApp(#[from] WhatsAppError),
}

impl DeliveryError {
    /// Whether retrying the same message can never succeed.
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::NotConfigured(_) | Self::UnknownChannel(_) => true,
            Self::Email(e) => e.is_permanent(),
            Self::WhatsApp(e) => e.is_permanent(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sender traits
// ---------------------------------------------------------------------------

/// Sends HTML email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), DeliveryError>;
}

/// Sends WhatsApp text messages. `to` is any number [`to_e164`] accepts.
///
/// [`to_e164`]: ready4u_core::phone::to_e164
#[async_trait]
pub trait WhatsAppSender: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), DeliveryError>;
}

// ---------------------------------------------------------------------------
// Senders
// ---------------------------------------------------------------------------

/// The configured channels, shared by the dispatcher and the HTTP relays.
#[derive(Clone, Default)]
pub struct Senders {
    pub email: Option<Arc<dyn EmailSender>>,
    pub whatsapp: Option<Arc<dyn WhatsAppSender>>,
}

impl Senders {
    pub fn new(
        email: Option<Arc<dyn EmailSender>>,
        whatsapp: Option<Arc<dyn WhatsAppSender>>,
    ) -> Self {
        Self { email, whatsapp }
    }

    pub async fn send_email(&self, to: &str, subject: &str, html: &str) -> Result<(), DeliveryError> {
        let sender = self
            .email
            .as_ref()
            .ok_or(DeliveryError::NotConfigured(CHANNEL_EMAIL))?;
        sender.send_html(to, subject, html).await
    }

    pub async fn send_whatsapp(&self, to: &str, body: &str) -> Result<(), DeliveryError> {
        let sender = self
            .whatsapp
            .as_ref()
            .ok_or(DeliveryError::NotConfigured(CHANNEL_WHATSAPP))?;
        sender.send_text(to, body).await
    }

    /// Route one stored message to its channel.
    pub async fn deliver(
        &self,
        channel: &str,
        recipient: &str,
        subject: Option<&str>,
        body: &str,
    ) -> Result<(), DeliveryError> {
        match channel {
            CHANNEL_EMAIL => self.send_email(recipient, subject.unwrap_or_default(), body).await,
            CHANNEL_WHATSAPP => self.send_whatsapp(recipient, body).await,
            other => Err(DeliveryError::UnknownChannel(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn unconfigured_channels_fail_permanently() {
        let senders = Senders::default();

        let err = senders
            .deliver(CHANNEL_EMAIL, "a@b.c", Some("s"), "b")
            .await
            .unwrap_err();
        assert_matches!(err, DeliveryError::NotConfigured("email"));
        assert!(err.is_permanent());

        let err = senders.send_whatsapp("9876543210", "hi").await.unwrap_err();
        assert_matches!(err, DeliveryError::NotConfigured("whatsapp"));
    }

    #[tokio::test]
    async fn unknown_channel_is_rejected() {
        let err = Senders::default()
            .deliver("sms", "1", None, "b")
            .await
            .unwrap_err();
        assert_matches!(err, DeliveryError::UnknownChannel(c) if c == "sms");
    }

    #[test]
    fn provider_status_decides_permanence() {
        assert!(DeliveryError::from(WhatsAppError::HttpStatus(400)).is_permanent());
        assert!(!DeliveryError::from(WhatsAppError::HttpStatus(429)).is_permanent());
        assert!(!DeliveryError::from(WhatsAppError::HttpStatus(503)).is_permanent());
    }
}
