//! Well-known notification channel name constants.
//!
//! These must match the values stored in `notification_outbox.channel`.

/// Transactional HTML email delivered via SMTP.
pub const CHANNEL_EMAIL: &str = "email";

/// WhatsApp message delivered through the messaging provider.
pub const CHANNEL_WHATSAPP: &str = "whatsapp";

/// All valid channel values.
pub const VALID_CHANNELS: &[&str] = &[CHANNEL_EMAIL, CHANNEL_WHATSAPP];
