//! Seller identity model and signup DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sellerdesk_core::status::StatusId;
use sellerdesk_core::types::{DbId, Timestamp};

use super::manager_contact::{ManagerContact, NewManagerContact};
use super::snapshot::SellerSnapshot;

/// A row from the `sellers` table. Identity only; attributes live in snapshots.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Seller {
    pub id: DbId,
    pub registered_at: Timestamp,
    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,
}

/// Signup input. The password is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewSeller {
    pub account: String,
    pub password_hash: String,
    pub korean_name: String,
    pub english_name: String,
    pub cs_phone: String,
    pub property_id: StatusId,
    pub managers: Vec<NewManagerContact>,
}

/// The active snapshot of a seller together with its manager contacts.
#[derive(Debug, Clone, Serialize)]
pub struct SellerProfile {
    #[serde(flatten)]
    pub snapshot: SellerSnapshot,
    pub managers: Vec<ManagerContact>,
}

/// What sign-in needs to know about an account.
#[derive(Debug, Clone, FromRow)]
pub struct SellerCredentials {
    pub seller_id: DbId,
    pub password_hash: String,
    pub status_id: StatusId,
    pub is_master: bool,
}

/// One entry of the seller picker used during product registration.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SellerLookup {
    pub seller_id: DbId,
    pub korean_name: String,
    pub profile_image: Option<String>,
    pub property_id: StatusId,
}
