//! Purchase-request state machine.
//!
//! A request carries two status fields: the conversational [`RequestStatus`]
//! and the download-gating [`PaymentStatus`]. They are only ever written as
//! one of the pairs accepted by [`RequestState::is_consistent`], and every
//! change goes through [`RequestState::apply`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::messages::NotificationKind;

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Conversational status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    DetailsSent,
    ScreenshotSubmitted,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::DetailsSent => "details_sent",
            Self::ScreenshotSubmitted => "screenshot_submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for RequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "details_sent" => Ok(Self::DetailsSent),
            "screenshot_submitted" => Ok(Self::ScreenshotSubmitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid request status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment verification status; the field that gates downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    NotPaid,
    PendingVerification,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotPaid => "not_paid",
            Self::PendingVerification => "pending_verification",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_paid" => Ok(Self::NotPaid),
            "pending_verification" => Ok(Self::PendingVerification),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid payment status '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RequestState
// ---------------------------------------------------------------------------

/// The (status, payment status) pair of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestState {
    pub status: RequestStatus,
    pub payment_status: PaymentStatus,
}

/// A state change requested by a user or an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Admin has sent payment details to the requester.
    DetailsSent,
    /// Requester reports having paid and sent a screenshot.
    PaymentSubmitted,
    /// Admin verified the payment.
    Approve,
    /// Admin rejected the payment.
    Reject,
}

/// Result of applying a [`Transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub next: RequestState,
    /// `false` when the request already was in the target payment state.
    pub changed: bool,
    /// Notification to send to the requester, if any.
    pub notification: Option<NotificationKind>,
    /// Whether this transition counts a new sale for the project.
    pub records_sale: bool,
}

impl RequestState {
    /// State of a freshly submitted request.
    pub const SUBMITTED: Self = Self {
        status: RequestStatus::Pending,
        payment_status: PaymentStatus::NotPaid,
    };

    pub const fn new(status: RequestStatus, payment_status: PaymentStatus) -> Self {
        Self {
            status,
            payment_status,
        }
    }

    /// Parse a state from its stored string columns.
    pub fn parse(status: &str, payment_status: &str) -> Result<Self, CoreError> {
        Ok(Self::new(status.parse()?, payment_status.parse()?))
    }

    /// Whether the pair is one this service writes.
    pub fn is_consistent(&self) -> bool {
        use PaymentStatus as P;
        use RequestStatus as S;
        matches!(
            (self.status, self.payment_status),
            (S::Pending, P::NotPaid)
                | (S::DetailsSent, P::NotPaid)
                | (S::ScreenshotSubmitted, P::PendingVerification)
                | (S::Approved, P::Verified)
                | (S::Rejected, P::Rejected)
        )
    }

    /// Downloads are unlocked exactly when the payment is verified.
    pub fn download_enabled(&self) -> bool {
        self.payment_status == PaymentStatus::Verified
    }

    /// Compute the next state for `transition`.
    ///
    /// Approve is rejected once a payment has been rejected. Re-approving a
    /// verified request is allowed but reports `changed == false`, so no
    /// second notification or sale is produced. Reject is accepted from any
    /// state.
    pub fn apply(self, transition: Transition) -> Result<TransitionOutcome, CoreError> {
        use PaymentStatus as P;
        use RequestStatus as S;

        let (next, changed) = match transition {
            Transition::DetailsSent => match (self.status, self.payment_status) {
                (S::Pending, P::NotPaid) => (Self::new(S::DetailsSent, P::NotPaid), true),
                (S::DetailsSent, P::NotPaid) => (self, false),
                _ => return Err(self.conflict(transition)),
            },
            Transition::PaymentSubmitted => match (self.status, self.payment_status) {
                (S::Pending | S::DetailsSent, P::NotPaid) => (
                    Self::new(S::ScreenshotSubmitted, P::PendingVerification),
                    true,
                ),
                (S::ScreenshotSubmitted, P::PendingVerification) => (self, false),
                _ => return Err(self.conflict(transition)),
            },
            Transition::Approve => {
                if self.payment_status == P::Rejected {
                    return Err(self.conflict(transition));
                }
                (
                    Self::new(S::Approved, P::Verified),
                    self.payment_status != P::Verified,
                )
            }
            Transition::Reject => (
                Self::new(S::Rejected, P::Rejected),
                self.payment_status != P::Rejected,
            ),
        };

        let notification = match transition {
            Transition::Approve if changed => Some(NotificationKind::PaymentVerified),
            Transition::Reject if changed => Some(NotificationKind::PaymentRejected),
            _ => None,
        };

        Ok(TransitionOutcome {
            next,
            changed,
            notification,
            records_sale: transition == Transition::Approve && changed,
        })
    }

    fn conflict(&self, transition: Transition) -> CoreError {
        CoreError::Conflict(format!(
            "Cannot apply {transition:?} to a request in state ({}, {})",
            self.status, self.payment_status
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
