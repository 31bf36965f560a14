//! Repository for the append-only `status_change_records` table.

use sqlx::PgExecutor;
use sellerdesk_core::status::StatusId;
use sellerdesk_core::types::{DbId, Timestamp};

use crate::models::status_history::StatusChangeRecord;

/// Appends and lists seller status transitions. Records are never updated
/// or deleted.
pub struct StatusHistoryRepo;

impl StatusHistoryRepo {
    /// Record that `seller_id` moved to `status_id` at `occurred_at`.
    pub async fn append<'e>(
        executor: impl PgExecutor<'e>,
        seller_id: DbId,
        status_id: StatusId,
        actor_id: Option<DbId>,
        occurred_at: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO status_change_records (seller_id, status_id, actor_id, occurred_at) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(seller_id)
        .bind(status_id)
        .bind(actor_id)
        .bind(occurred_at)
        .fetch_one(executor)
        .await
    }

    /// Transitions of a seller, newest first. Ties on `occurred_at` resolve
    /// to the most recently inserted record first.
    pub async fn list_for<'e>(
        executor: impl PgExecutor<'e>,
        seller_id: DbId,
    ) -> Result<Vec<StatusChangeRecord>, sqlx::Error> {
        sqlx::query_as::<_, StatusChangeRecord>(
            "SELECT r.id, r.seller_id, r.status_id, st.name AS status_name, \
                    r.actor_id, r.occurred_at \
             FROM status_change_records r \
             JOIN seller_statuses st ON st.id = r.status_id \
             WHERE r.seller_id = $1 \
             ORDER BY r.occurred_at DESC, r.id DESC",
        )
        .bind(seller_id)
        .fetch_all(executor)
        .await
    }
}
