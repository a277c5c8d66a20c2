//! WhatsApp delivery through the Twilio Messages API.
//!
//! Numbers are normalised to `+<digits>` and addressed as
//! `whatsapp:+<digits>`. If any of the account SID, auth token, or sender
//! number is missing, [`WhatsAppConfig::from_env`] returns `None`.

use std::time::Duration;

use async_trait::async_trait;
use ready4u_core::phone::whatsapp_address;

use super::{DeliveryError, WhatsAppSender};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum WhatsAppError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("WhatsApp provider returned HTTP {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    InvalidNumber(String),
}

impl WhatsAppError {
    /// Client errors other than rate limiting will not succeed on retry.
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::Request(_) => false,
            Self::HttpStatus(status) => (400..500).contains(status) && *status != 429,
            Self::InvalidNumber(_) => true,
        }
    }
}

// ---------------------------------------------------------------------------
// WhatsAppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number, with or without the `whatsapp:` prefix.
    pub from_number: String,
    pub api_base: String,
}

impl WhatsAppConfig {
    /// | Variable               | Required | Default                  |
    /// |------------------------|----------|--------------------------|
    /// | `TWILIO_ACCOUNT_SID`   | yes      | --                       |
    /// | `TWILIO_AUTH_TOKEN`    | yes      | --                       |
    /// | `TWILIO_WHATSAPP_FROM` | yes      | --                       |
    /// | `TWILIO_API_BASE`      | no       | `https://api.twilio.com` |
    pub fn from_env() -> Option<Self> {
        Some(Self {
            account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok()?,
            auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok()?,
            from_number: std::env::var("TWILIO_WHATSAPP_FROM").ok()?,
            api_base: std::env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }

    fn from_address(&self) -> Result<String, WhatsAppError> {
        let raw = self
            .from_number
            .strip_prefix("whatsapp:")
            .unwrap_or(&self.from_number);
        whatsapp_address(raw).map_err(|e| WhatsAppError::InvalidNumber(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// WhatsAppDelivery
// ---------------------------------------------------------------------------

pub struct WhatsAppDelivery {
    client: reqwest::Client,
    config: WhatsAppConfig,
}

impl WhatsAppDelivery {
    pub fn new(config: WhatsAppConfig) -> Result<Self, WhatsAppError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    /// Send one message. `to` may be in any format `to_e164` accepts.
    pub async fn deliver(&self, to: &str, body: &str) -> Result<(), WhatsAppError> {
        let to_address =
            whatsapp_address(to).map_err(|e| WhatsAppError::InvalidNumber(e.to_string()))?;
        let from_address = self.config.from_address()?;

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("From", from_address.as_str()),
                ("To", to_address.as_str()),
                ("Body", body),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            tracing::warn!(to = %to_address, status, "WhatsApp provider rejected message");
            return Err(WhatsAppError::HttpStatus(status));
        }

        tracing::info!(to = %to_address, "WhatsApp message sent");
        Ok(())
    }
}

#[async_trait]
impl WhatsAppSender for WhatsAppDelivery {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), DeliveryError> {
        Ok(self.deliver(to, body).await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
