//! Shared response envelope types for API handlers.
//!
//! Versioned API responses use a `{ "data": ... }` envelope. The
//! unversioned `/api/*` endpoints keep the shapes their clients expect.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ success, message }` body returned by the notification relays.
#[derive(Debug, Serialize)]
pub struct RelayResponse {
    pub success: bool,
    pub message: String,
}

/// Body returned by request submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestResponse {
    pub success: bool,
    /// Human-facing `REQ-YYYY-NNNN` code.
    pub request_id: String,
    /// Row id; the name is kept for existing clients.
    pub firestore_id: String,
}
