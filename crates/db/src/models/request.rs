//! Purchase request model and DTOs.

use ready4u_core::analytics::RequestFacts;
use ready4u_core::error::CoreError;
use ready4u_core::request_status::RequestState;
use ready4u_core::types::{DbId, Rupees, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseRequest {
    pub id: DbId,
    pub request_code: String,
    pub project_id: DbId,
    pub project_name: String,
    pub user_id: DbId,
    pub user_name: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: String,
    pub college_name: Option<String>,
    pub message: Option<String>,
    pub amount: Rupees,
    pub status: String,
    pub payment_status: String,
    pub download_enabled: bool,
    pub transaction_id: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub verified_at: Option<Timestamp>,
    pub rejected_at: Option<Timestamp>,
}

impl PurchaseRequest {
    /// Parse the stored status pair.
    pub fn state(&self) -> Result<RequestState, CoreError> {
        RequestState::parse(&self.status, &self.payment_status)
    }
}

/// Values for inserting a freshly submitted request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub request_code: String,
    pub project_id: DbId,
    pub project_name: String,
    pub user_id: DbId,
    pub user_name: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: String,
    pub college_name: Option<String>,
    pub message: Option<String>,
    pub amount: Rupees,
}

/// Field changes written together with a state transition.
#[derive(Debug, Clone, Default)]
pub struct StateWrite<'a> {
    pub transaction_id: Option<&'a str>,
    pub rejection_reason: Option<&'a str>,
    pub set_verified_at: bool,
    pub set_rejected_at: bool,
}

/// Admin listing filter. All fields are equality matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub user_id: Option<DbId>,
}

/// The columns analytics folds over.
#[derive(Debug, Clone, FromRow)]
pub struct RequestFactsRow {
    pub payment_status: String,
    pub amount: Rupees,
    pub download_enabled: bool,
}

impl RequestFactsRow {
    pub fn into_facts(self) -> Result<RequestFacts, CoreError> {
        Ok(RequestFacts {
            payment_status: self.payment_status.parse()?,
            amount: self.amount,
            download_enabled: self.download_enabled,
        })
    }
}

/// Public tracking view with contact fields masked.
#[derive(Debug, Clone, Serialize)]
pub struct TrackedRequest {
    pub request_code: String,
    pub project_name: String,
    pub user_name: String,
    pub email: String,
    pub whatsapp: String,
    pub amount: Rupees,
    pub status: String,
    pub payment_status: String,
    pub download_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PurchaseRequest> for TrackedRequest {
    fn from(r: PurchaseRequest) -> Self {
        Self {
            email: mask_email(&r.email),
            whatsapp: mask_phone(&r.whatsapp),
            request_code: r.request_code,
            project_name: r.project_name,
            user_name: r.user_name,
            amount: r.amount,
            status: r.status,
            payment_status: r.payment_status,
            download_enabled: r.download_enabled,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// `asha@example.com` -> `a***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}

/// Keep only the last four digits.
pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(digits.len() - 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_mask_keeps_first_char_and_domain() {
        assert_eq!(mask_email("asha@example.com"), "a***@example.com");
        assert_eq!(mask_email("nonsense"), "***");
    }

    #[test]
    fn phone_mask_keeps_last_four() {
        assert_eq!(mask_phone("9876543210"), "******3210");
        assert_eq!(mask_phone("+91 98765-43210"), "********3210");
        assert_eq!(mask_phone("12"), "**");
    }
}
