//! Status change audit records (append-only, no `updated_at`).

use serde::Serialize;
use sqlx::FromRow;
use sellerdesk_core::status::StatusId;
use sellerdesk_core::types::{DbId, Timestamp};

/// A row from `status_change_records`, joined with the status name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusChangeRecord {
    pub id: DbId,
    pub seller_id: DbId,
    pub status_id: StatusId,
    pub status_name: String,
    pub actor_id: Option<DbId>,
    pub occurred_at: Timestamp,
}
