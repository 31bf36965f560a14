//! Versioned seller profile snapshots.
//!
//! A snapshot is never updated in place. A revision closes the active row and
//! inserts a copy of it with the [`SellerChangeSet`] overlaid.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sellerdesk_core::status::StatusId;
use sellerdesk_core::types::{DbId, Timestamp};
use sellerdesk_core::versioning::SnapshotValidity;

use super::manager_contact::NewManagerContact;

/// Every mutable seller attribute, i.e. everything a revision may copy.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SellerAttributes {
    pub status_id: StatusId,
    pub property_id: StatusId,
    pub account: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub korean_name: String,
    pub english_name: String,
    pub cs_phone: String,
    pub profile_image: Option<String>,
    pub background_image: Option<String>,
    pub simple_description: Option<String>,
    pub detail_description: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub detail_address: Option<String>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub bank_id: Option<StatusId>,
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
    pub shipping_information: Option<String>,
    pub exchange_refund_information: Option<String>,
    pub model_height: Option<String>,
    pub model_top_size: Option<String>,
    pub model_bottom_size: Option<String>,
    pub model_feet_size: Option<String>,
    pub shopping_feedtext: Option<String>,
    pub registered_product_count: i32,
    pub is_master: bool,
}

impl SellerAttributes {
    /// Attributes of a freshly signed-up seller. Optional shop copy starts empty.
    pub fn initial(
        status_id: StatusId,
        property_id: StatusId,
        account: String,
        password_hash: String,
        korean_name: String,
        english_name: String,
        cs_phone: String,
    ) -> Self {
        Self {
            status_id,
            property_id,
            account,
            password_hash,
            korean_name,
            english_name,
            cs_phone,
            profile_image: None,
            background_image: None,
            simple_description: None,
            detail_description: None,
            zip_code: None,
            address: None,
            detail_address: None,
            open_time: None,
            close_time: None,
            bank_id: None,
            bank_account_number: None,
            bank_account_name: None,
            shipping_information: None,
            exchange_refund_information: None,
            model_height: None,
            model_top_size: None,
            model_bottom_size: None,
            model_feet_size: None,
            shopping_feedtext: None,
            registered_product_count: 0,
            is_master: false,
        }
    }
}

/// Raw `seller_snapshots` row; `expired_at` still carries the sentinel.
#[derive(Debug, Clone, FromRow)]
pub struct SellerSnapshotRow {
    pub id: DbId,
    pub seller_id: DbId,
    #[sqlx(flatten)]
    pub attributes: SellerAttributes,
    pub modifier_id: Option<DbId>,
    pub created_at: Timestamp,
    pub expired_at: Timestamp,
}

/// One version of a seller's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerSnapshot {
    pub id: DbId,
    pub seller_id: DbId,
    #[serde(flatten)]
    pub attributes: SellerAttributes,
    pub modifier_id: Option<DbId>,
    pub created_at: Timestamp,
    pub validity: SnapshotValidity,
}

impl SellerSnapshot {
    pub fn is_active(&self) -> bool {
        self.validity.is_active()
    }
}

impl From<SellerSnapshotRow> for SellerSnapshot {
    fn from(row: SellerSnapshotRow) -> Self {
        Self {
            id: row.id,
            seller_id: row.seller_id,
            attributes: row.attributes,
            modifier_id: row.modifier_id,
            created_at: row.created_at,
            validity: SnapshotValidity::from_expiry(row.expired_at),
        }
    }
}

/// Fields a revision overlays on the previous snapshot. `None` keeps the
/// previous value; there is no way to clear an optional attribute.
///
/// `managers`, when present, replaces the seller's contacts wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SellerChangeSet {
    pub status_id: Option<StatusId>,
    pub property_id: Option<StatusId>,
    pub account: Option<String>,
    pub password_hash: Option<String>,
    pub korean_name: Option<String>,
    pub english_name: Option<String>,
    pub cs_phone: Option<String>,
    pub profile_image: Option<String>,
    pub background_image: Option<String>,
    pub simple_description: Option<String>,
    pub detail_description: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub detail_address: Option<String>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub bank_id: Option<StatusId>,
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
    pub shipping_information: Option<String>,
    pub exchange_refund_information: Option<String>,
    pub model_height: Option<String>,
    pub model_top_size: Option<String>,
    pub model_bottom_size: Option<String>,
    pub model_feet_size: Option<String>,
    pub shopping_feedtext: Option<String>,
    pub managers: Option<Vec<NewManagerContact>>,
}

/// Overlay an optional new value on a required attribute.
fn pick<T: Clone>(change: &Option<T>, previous: &T) -> T {
    change.as_ref().unwrap_or(previous).clone()
}

/// Overlay an optional new value on an optional attribute.
fn pick_opt<T: Clone>(change: &Option<T>, previous: &Option<T>) -> Option<T> {
    change.as_ref().or(previous.as_ref()).cloned()
}

impl SellerChangeSet {
    /// Copy `previous` and overlay every field present in this change set.
    pub fn apply_to(&self, previous: &SellerAttributes) -> SellerAttributes {
        SellerAttributes {
            status_id: pick(&self.status_id, &previous.status_id),
            property_id: pick(&self.property_id, &previous.property_id),
            account: pick(&self.account, &previous.account),
            password_hash: pick(&self.password_hash, &previous.password_hash),
            korean_name: pick(&self.korean_name, &previous.korean_name),
            english_name: pick(&self.english_name, &previous.english_name),
            cs_phone: pick(&self.cs_phone, &previous.cs_phone),
            profile_image: pick_opt(&self.profile_image, &previous.profile_image),
            background_image: pick_opt(&self.background_image, &previous.background_image),
            simple_description: pick_opt(&self.simple_description, &previous.simple_description),
            detail_description: pick_opt(&self.detail_description, &previous.detail_description),
            zip_code: pick_opt(&self.zip_code, &previous.zip_code),
            address: pick_opt(&self.address, &previous.address),
            detail_address: pick_opt(&self.detail_address, &previous.detail_address),
            open_time: pick_opt(&self.open_time, &previous.open_time),
            close_time: pick_opt(&self.close_time, &previous.close_time),
            bank_id: pick_opt(&self.bank_id, &previous.bank_id),
            bank_account_number: pick_opt(
                &self.bank_account_number,
                &previous.bank_account_number,
            ),
            bank_account_name: pick_opt(&self.bank_account_name, &previous.bank_account_name),
            shipping_information: pick_opt(
                &self.shipping_information,
                &previous.shipping_information,
            ),
            exchange_refund_information: pick_opt(
                &self.exchange_refund_information,
                &previous.exchange_refund_information,
            ),
            model_height: pick_opt(&self.model_height, &previous.model_height),
            model_top_size: pick_opt(&self.model_top_size, &previous.model_top_size),
            model_bottom_size: pick_opt(&self.model_bottom_size, &previous.model_bottom_size),
            model_feet_size: pick_opt(&self.model_feet_size, &previous.model_feet_size),
            shopping_feedtext: pick_opt(&self.shopping_feedtext, &previous.shopping_feedtext),
            registered_product_count: previous.registered_product_count,
            is_master: previous.is_master,
        }
    }

    /// The new status id, if this change set moves the seller to another status.
    pub fn status_transition(&self, previous: &SellerAttributes) -> Option<StatusId> {
        self.status_id.filter(|id| *id != previous.status_id)
    }
}
