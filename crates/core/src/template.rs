//! Email template resolution and `{{token}}` rendering.
//!
//! Rendering is a single left-to-right pass: substituted values are never
//! rescanned, so a value containing `{{projectName}}` is emitted literally.
//! Tokens without a value render as the empty string.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key of the template used for the request-received email.
pub const TEMPLATE_REQUEST_RECEIVED: &str = "request-received";

/// Tokens a stored template must contain to be used instead of the default.
pub const REQUIRED_TOKENS: &[&str] = &["{{projectName}}", "{{userName}}"];

pub const DEFAULT_SUBJECT: &str = "Payment Request Received - Projects Ready 4 You";
pub const DEFAULT_WHATSAPP_SUPPORT: &str = "+919986062337";
pub const DEFAULT_EMAIL_SUPPORT: &str = "support@projectsready4you.com";

/// An email template with its support contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub content: String,
    pub whatsapp_support: String,
    pub email_support: String,
}

impl EmailTemplate {
    /// Whether the content carries every token in [`REQUIRED_TOKENS`].
    pub fn is_usable(&self) -> bool {
        REQUIRED_TOKENS.iter().all(|t| self.content.contains(t))
    }

    /// Reject blank fields before persisting an admin edit.
    pub fn validate_for_save(&self) -> Result<(), String> {
        if self.subject.trim().is_empty() || self.content.trim().is_empty() {
            return Err("Subject and content are required".to_string());
        }
        if self.whatsapp_support.trim().is_empty() || self.email_support.trim().is_empty() {
            return Err("Support contact information is required".to_string());
        }
        Ok(())
    }
}

/// Pick the stored template if it is usable, else the built-in default.
pub fn resolve_request_received(stored: Option<EmailTemplate>) -> EmailTemplate {
    match stored {
        Some(t) if t.is_usable() => t,
        _ => default_request_received(),
    }
}

/// Render `template`, replacing each `{{name}}` with `vars[name]`.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) if is_token_name(&after_open[..end]) => {
                if let Some(value) = vars.get(&after_open[..end]) {
                    out.push_str(value);
                }
                rest = &after_open[end + 2..];
            }
            _ => {
                out.push_str("{{");
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_token_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// The built-in request-received template.
pub fn default_request_received() -> EmailTemplate {
    EmailTemplate {
        subject: DEFAULT_SUBJECT.to_string(),
        content: DEFAULT_REQUEST_RECEIVED_HTML.to_string(),
        whatsapp_support: DEFAULT_WHATSAPP_SUPPORT.to_string(),
        email_support: DEFAULT_EMAIL_SUPPORT.to_string(),
    }
}

const DEFAULT_REQUEST_RECEIVED_HTML: &str = r#"
<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #667eea;">Payment Request Received ✅</h2>
  <p>Hi {{userName}},</p>
  <p>Thank you for your interest! We received your payment request for <strong>{{projectName}}</strong>.</p>

  <div style="background: #f5f5f5; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="margin-top: 0;">Request Details:</h3>
    <p><strong>Request ID:</strong> {{requestId}}</p>
    <p><strong>Project:</strong> {{projectName}}</p>
    <p><strong>Amount:</strong> ₹{{amount}}</p>
  </div>

  <h3>How to Proceed:</h3>
  <p style="color: #333; line-height: 1.6;">
    Our admin team will contact you shortly via WhatsApp with payment details. You can pay using
    UPI, bank transfer, or credit/debit card.
  </p>

  <h3>Next Steps:</h3>
  <ol style="color: #333;">
    <li><strong>Wait for WhatsApp Contact:</strong> Our admin will message you with payment options</li>
    <li><strong>Make the Payment:</strong> Use the provided UPI ID or bank details</li>
    <li><strong>Send Confirmation:</strong> Send a screenshot of the receipt via WhatsApp</li>
    <li><strong>Get Access:</strong> We'll verify and grant you access within 24 hours</li>
  </ol>

  <p style="color: #666; font-size: 14px; margin-top: 30px;">
    <strong>WhatsApp Support:</strong> {{whatsappSupport}}<br>
    <strong>Email Support:</strong> {{emailSupport}}
  </p>

  <p style="color: #999; font-size: 12px;">This is an automated email. Please don't reply to this email.</p>
</div>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn replaces_every_occurrence() {
        let out = render(
            "{{projectName}} / {{projectName}}",
            &vars(&[("projectName", "Chat App")]),
        );
        assert_eq!(out, "Chat App / Chat App");
    }

    #[test]
    fn missing_tokens_render_empty() {
        let out = render("Hi {{userName}}{{nope}}!", &vars(&[]));
        assert_eq!(out, "Hi !");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let out = render(
            "{{userName}} bought {{projectName}}",
            &vars(&[("userName", "{{projectName}}"), ("projectName", "X")]),
        );
        assert_eq!(out, "{{projectName}} bought X");
    }

    #[test]
    fn unterminated_and_non_token_braces_pass_through() {
        assert_eq!(render("a {{ b", &vars(&[])), "a {{ b");
        assert_eq!(render("{{not a token}}", &vars(&[])), "{{not a token}}");
    }

    #[test]
    fn amount_is_inserted_raw() {
        let out = render("₹{{amount}}", &vars(&[("amount", "500")]));
        assert_eq!(out, "₹500");
    }

    #[test]
    fn escape_html_neutralises_markup() {
        assert_eq!(
            escape_html(r#"<b onclick="x">Tom & 'Jerry'</b>"#),
            "&lt;b onclick=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn missing_template_falls_back_to_default() {
        let t = resolve_request_received(None);
        assert_eq!(t, default_request_received());
        assert_eq!(t.subject, DEFAULT_SUBJECT);
        assert_eq!(t.whatsapp_support, DEFAULT_WHATSAPP_SUPPORT);
        assert_eq!(t.email_support, DEFAULT_EMAIL_SUPPORT);
    }

    #[test]
    fn template_missing_required_tokens_falls_back() {
        let stored = EmailTemplate {
            subject: "Custom".into(),
            content: "Hello {{userName}}".into(),
            whatsapp_support: "+1".into(),
            email_support: "a@b.c".into(),
        };
        assert_eq!(resolve_request_received(Some(stored)), default_request_received());
    }

    #[test]
    fn usable_stored_template_is_kept() {
        let stored = EmailTemplate {
            subject: "Custom".into(),
            content: "{{userName}} -> {{projectName}}".into(),
            whatsapp_support: "+1".into(),
            email_support: "a@b.c".into(),
        };
        assert_eq!(resolve_request_received(Some(stored.clone())), stored);
    }

    #[test]
    fn default_template_is_usable() {
        assert!(default_request_received().is_usable());
    }

    #[test]
    fn blank_fields_fail_save_validation() {
        let mut t = default_request_received();
        t.email_support = "  ".into();
        assert!(t.validate_for_save().is_err());
        assert!(default_request_received().validate_for_save().is_ok());
    }
}
