//! Repository for the `requests` table.

use ready4u_core::request_status::RequestState;
use ready4u_core::types::DbId;
use sqlx::PgPool;

use crate::models::request::{
    NewRequest, PurchaseRequest, RequestFactsRow, RequestFilter, StateWrite,
};

const COLUMNS: &str = "id, request_code, project_id, project_name, user_id, user_name, \
    email, phone, whatsapp, college_name, message, amount, status, payment_status, \
    download_enabled, transaction_id, rejection_reason, created_at, updated_at, \
    verified_at, rejected_at";

/// Name of the unique constraint on `request_code`.
pub const REQUEST_CODE_CONSTRAINT: &str = "uq_requests_request_code";

/// Provides persistence for purchase requests.
///
/// State changes are only written through [`RequestRepo::write_state`],
/// inside a transaction that holds the row lock from
/// [`RequestRepo::lock_by_id`].
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a submitted request in `(pending, not_paid)`.
    pub async fn insert(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &NewRequest,
    ) -> Result<PurchaseRequest, sqlx::Error> {
        let state = RequestState::SUBMITTED;
        let query = format!(
            "INSERT INTO requests (
                request_code, project_id, project_name, user_id, user_name, email, phone,
                whatsapp, college_name, message, amount, status, payment_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(&input.request_code)
            .bind(input.project_id)
            .bind(&input.project_name)
            .bind(input.user_id)
            .bind(&input.user_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.whatsapp)
            .bind(&input.college_name)
            .bind(&input.message)
            .bind(input.amount)
            .bind(state.status.as_str())
            .bind(state.payment_status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PurchaseRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1");
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_code(
        pool: &PgPool,
        request_code: &str,
    ) -> Result<Option<PurchaseRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE request_code = $1");
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(request_code)
            .fetch_optional(pool)
            .await
    }

    /// Admin listing, newest first, with optional equality filters.
    pub async fn list(
        pool: &PgPool,
        filter: &RequestFilter,
    ) -> Result<Vec<PurchaseRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requests
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2::TEXT IS NULL OR payment_status = $2)
               AND ($3::BIGINT IS NULL OR user_id = $3)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(&filter.status)
            .bind(&filter.payment_status)
            .bind(filter.user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PurchaseRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requests WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Load a request and hold its row lock until the transaction ends.
    pub async fn lock_by_id(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<PurchaseRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write a new state pair. `download_enabled` is derived from the state.
    pub async fn write_state(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        state: RequestState,
        fields: &StateWrite<'_>,
    ) -> Result<PurchaseRequest, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET
                status = $2,
                payment_status = $3,
                download_enabled = $4,
                transaction_id = COALESCE($5, transaction_id),
                rejection_reason = COALESCE($6, rejection_reason),
                verified_at = CASE WHEN $7 THEN NOW() ELSE verified_at END,
                rejected_at = CASE WHEN $8 THEN NOW() ELSE rejected_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PurchaseRequest>(&query)
            .bind(id)
            .bind(state.status.as_str())
            .bind(state.payment_status.as_str())
            .bind(state.download_enabled())
            .bind(fields.transaction_id)
            .bind(fields.rejection_reason)
            .bind(fields.set_verified_at)
            .bind(fields.set_rejected_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Every request's analytics columns.
    pub async fn list_facts(pool: &PgPool) -> Result<Vec<RequestFactsRow>, sqlx::Error> {
        sqlx::query_as::<_, RequestFactsRow>(
            "SELECT payment_status, amount, download_enabled FROM requests",
        )
        .fetch_all(pool)
        .await
    }
}
