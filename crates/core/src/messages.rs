//! Notification message builders for request lifecycle events.
//!
//! Each [`NotificationKind`] expands to one email and one WhatsApp message
//! addressed to the requester. Values inserted into HTML are escaped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::channels::{CHANNEL_EMAIL, CHANNEL_WHATSAPP};
use crate::template::{escape_html, render, EmailTemplate};
use crate::types::Rupees;

/// Rendered when the requester left their name blank.
pub const FALLBACK_USER_NAME: &str = "User";

/// Rendered when the request has no project name.
pub const FALLBACK_PROJECT_NAME: &str = "Your Project";

const BRAND_SIGNATURE: &str = "Projects Ready 4 You 🚀";

/// Lifecycle events that notify the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RequestReceived,
    PaymentVerified,
    PaymentRejected,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestReceived => "request_received",
            Self::PaymentVerified => "payment_verified",
            Self::PaymentRejected => "payment_rejected",
        }
    }
}

/// Request data needed to address and fill a notification.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    pub user_name: &'a str,
    pub project_name: &'a str,
    pub request_code: &'a str,
    pub amount: Rupees,
    pub email: &'a str,
    pub whatsapp: &'a str,
    /// Admin-supplied reason, only used for rejections.
    pub reason: Option<&'a str>,
}

impl RequestContext<'_> {
    fn user_name(&self) -> &str {
        non_blank_or(self.user_name, FALLBACK_USER_NAME)
    }

    fn project_name(&self) -> &str {
        non_blank_or(self.project_name, FALLBACK_PROJECT_NAME)
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// A message ready to be queued for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub channel: &'static str,
    pub recipient: String,
    /// Email subject; `None` for WhatsApp.
    pub subject: Option<String>,
    pub body: String,
}

/// Build the email and WhatsApp messages for `kind`.
///
/// `template` is only consulted for [`NotificationKind::RequestReceived`];
/// pass the already-resolved template (see
/// [`resolve_request_received`](crate::template::resolve_request_received)).
pub fn build_messages(
    kind: NotificationKind,
    ctx: &RequestContext<'_>,
    template: &EmailTemplate,
) -> Vec<OutgoingMessage> {
    let (subject, html, text) = match kind {
        NotificationKind::RequestReceived => request_received(ctx, template),
        NotificationKind::PaymentVerified => payment_verified(ctx),
        NotificationKind::PaymentRejected => payment_rejected(ctx, template),
    };

    vec![
        OutgoingMessage {
            channel: CHANNEL_EMAIL,
            recipient: ctx.email.to_string(),
            subject: Some(subject),
            body: html,
        },
        OutgoingMessage {
            channel: CHANNEL_WHATSAPP,
            recipient: ctx.whatsapp.to_string(),
            subject: None,
            body: text,
        },
    ]
}

fn request_received(ctx: &RequestContext<'_>, template: &EmailTemplate) -> (String, String, String) {
    let vars: HashMap<&str, String> = HashMap::from([
        ("userName", escape_html(ctx.user_name())),
        ("projectName", escape_html(ctx.project_name())),
        ("requestId", escape_html(ctx.request_code)),
        ("amount", ctx.amount.to_string()),
        ("whatsappSupport", escape_html(&template.whatsapp_support)),
        ("emailSupport", escape_html(&template.email_support)),
    ]);
    let html = render(&template.content, &vars);

    let text = format!(
        "Hi {}! 👋\n\nWe received your payment request for {}.\n\nRequest ID: {}\n\n\
         Our admin will send you payment details shortly. Check your email for more info!\n\n{BRAND_SIGNATURE}",
        ctx.user_name(),
        ctx.project_name(),
        ctx.request_code,
    );

    (template.subject.clone(), html, text)
}

fn payment_verified(ctx: &RequestContext<'_>) -> (String, String, String) {
    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #667eea;">✅ Payment Verified!</h2>
  <p>Hi {name},</p>
  <p>Great news! Your payment has been verified successfully. Your download access is now active!</p>
  <div style="background: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="margin-top: 0;">Download Details:</h3>
    <p><strong>Project:</strong> {project}</p>
    <p><strong>Request ID:</strong> {code}</p>
    <p><strong>Access Level:</strong> Full Download</p>
  </div>
  <p style="color: #666;">Check your account dashboard for the download link.</p>
  <p style="color: #999; font-size: 12px; margin-top: 30px;">This is an automated email. Please don't reply to this email.</p>
</div>"#,
        name = escape_html(ctx.user_name()),
        project = escape_html(ctx.project_name()),
        code = escape_html(ctx.request_code),
    );

    let text = format!(
        "🎉 Great news {}!\n\nYour payment has been verified successfully! ✅\n\n\
         You now have full access to download {}.\n\nCheck your dashboard to download the files.\n\n{BRAND_SIGNATURE}",
        ctx.user_name(),
        ctx.project_name(),
    );

    (
        "Payment Verified! Download Access Granted".to_string(),
        html,
        text,
    )
}

fn payment_rejected(ctx: &RequestContext<'_>, template: &EmailTemplate) -> (String, String, String) {
    let reason_html = ctx
        .reason
        .filter(|r| !r.trim().is_empty())
        .map(|r| format!("<p><strong>Reason:</strong> {}</p>", escape_html(r)))
        .unwrap_or_default();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #e53935;">Payment Could Not Be Verified</h2>
  <p>Hi {name},</p>
  <p>We could not verify the payment for <strong>{project}</strong> (Request ID: {code}).</p>
  {reason_html}
  <p>If you believe this is a mistake, contact us on WhatsApp at {whatsapp} or email {email}.</p>
</div>"#,
        name = escape_html(ctx.user_name()),
        project = escape_html(ctx.project_name()),
        code = escape_html(ctx.request_code),
        whatsapp = escape_html(&template.whatsapp_support),
        email = escape_html(&template.email_support),
    );

    let text = format!(
        "Hi {}, we could not verify your payment for {} (Request ID: {}).\n\n\
         Please contact us on WhatsApp at {} if you need help.\n\n{BRAND_SIGNATURE}",
        ctx.user_name(),
        ctx.project_name(),
        ctx.request_code,
        template.whatsapp_support,
    );

    ("Payment Verification Failed".to_string(), html, text)
}
