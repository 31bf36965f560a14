//! Manager contact entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sellerdesk_core::types::{DbId, Timestamp};

/// A row from the `manager_contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ManagerContact {
    pub id: DbId,
    pub seller_id: DbId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: String,
    pub created_at: Timestamp,
}

/// DTO for one contact in a signup or a wholesale replacement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewManagerContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: String,
}
