//! SMTP email channel.
//!
//! The transport is built once in [`EmailDelivery::new`] and keeps its own
//! connection pool, so the dispatcher can send a batch without reconnecting
//! per message.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{DeliveryError, EmailSender};

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "Projects Ready 4 You <noreply@projectsready4you.com>";

/// Email delivery failure.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(#[from] lettre::error::Error),
}

impl EmailError {
    /// Bad addresses and 5xx SMTP replies will fail again on retry.
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_permanent(),
            Self::Address(_) | Self::Build(_) => true,
        }
    }
}

/// SMTP settings.
///
/// | Variable         | Default                                                 |
/// |------------------|---------------------------------------------------------|
/// | `SMTP_HOST`      | unset disables the channel                              |
/// | `SMTP_PORT`      | `587`                                                   |
/// | `EMAIL_FROM`     | `Projects Ready 4 You <noreply@projectsready4you.com>`  |
/// | `SMTP_USER`      | none                                                    |
/// | `EMAIL_PASSWORD` | none                                                    |
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// `None` when `SMTP_HOST` is unset or blank.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Some(Self {
            smtp_host: var("SMTP_HOST")?,
            smtp_port: var("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: var("EMAIL_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: var("SMTP_USER"),
            smtp_password: var("EMAIL_PASSWORD"),
        })
    }
}

/// Sends HTML mail through one STARTTLS relay.
pub struct EmailDelivery {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Parse the sender and build the pooled transport. No connection is
    /// opened until the first send.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);
        if let (Some(user), Some(password)) = (config.smtp_user, config.smtp_password) {
            builder = builder.credentials(Credentials::new(user, password));
        }

        Ok(Self {
            from,
            transport: builder.build(),
        })
    }

    fn build_message(&self, to: &str, subject: &str, html: &str) -> Result<Message, EmailError> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())?)
    }

    pub async fn deliver(&self, to: &str, subject: &str, html: &str) -> Result<(), EmailError> {
        let message = self.build_message(to, subject, html)?;
        self.transport.send(message).await?;
        tracing::info!(to, subject, "Email sent");
        Ok(())
    }
}

#[async_trait]
impl EmailSender for EmailDelivery {
    async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), DeliveryError> {
        Ok(self.deliver(to, subject, html).await?)
    }
}
