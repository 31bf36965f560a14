//! Repository for the `seller_snapshots` table.
//!
//! Owns the single-active-snapshot invariant. The active row of a seller
//! carries the sentinel `expired_at`; a revision closes it at `now` and opens
//! a new active row created at the same instant, so the history has no gaps.

use chrono::Utc;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgConnection, PgExecutor, Postgres};
use sellerdesk_core::error::CoreError;
use sellerdesk_core::types::{DbId, Timestamp};
use sellerdesk_core::versioning::{sentinel_expiry, SnapshotValidity};

use crate::error::StoreResult;
use crate::models::snapshot::{
    SellerAttributes, SellerChangeSet, SellerSnapshot, SellerSnapshotRow,
};
use crate::repositories::{ManagerContactRepo, SellerRepo, StatusHistoryRepo};

/// Columns of `seller_snapshots` holding [`SellerAttributes`], in bind order.
const ATTRIBUTE_COLUMNS: &str = "\
    status_id, property_id, account, password_hash, korean_name, english_name, \
    cs_phone, profile_image, background_image, simple_description, \
    detail_description, zip_code, address, detail_address, open_time, close_time, \
    bank_id, bank_account_number, bank_account_name, shipping_information, \
    exchange_refund_information, model_height, model_top_size, model_bottom_size, \
    model_feet_size, shopping_feedtext, registered_product_count, is_master";

/// Number of columns in [`ATTRIBUTE_COLUMNS`].
const ATTRIBUTE_COUNT: usize = 28;

/// Provides the versioned read and revise operations for seller profiles.
pub struct SellerSnapshotRepo;

impl SellerSnapshotRepo {
    /// The active snapshot of a non-deleted seller. Non-locking.
    pub async fn get_active<'e>(
        executor: impl PgExecutor<'e>,
        seller_id: DbId,
    ) -> StoreResult<SellerSnapshot> {
        let query = format!(
            "SELECT ss.id, ss.seller_id, {}, ss.modifier_id, ss.created_at, ss.expired_at \
             FROM seller_snapshots ss \
             JOIN sellers s ON s.id = ss.seller_id \
             WHERE ss.seller_id = $1 AND ss.expired_at = $2 AND s.is_deleted = false",
            qualified_attributes("ss")
        );
        let row = sqlx::query_as::<_, SellerSnapshotRow>(&query)
            .bind(seller_id)
            .bind(sentinel_expiry())
            .fetch_optional(executor)
            .await?;
        row.map(SellerSnapshot::from).ok_or_else(|| {
            CoreError::NotFound {
                entity: "SellerSnapshot",
                id: seller_id,
            }
            .into()
        })
    }

    /// The active snapshot, locked together with its seller row until the
    /// transaction ends.
    ///
    /// The seller row is locked first so that concurrent revisions of the
    /// same seller queue on it. A seller that exists but has no active row
    /// once the lock is granted was revised underneath a stale read.
    pub async fn get_active_for_update(
        conn: &mut PgConnection,
        seller_id: DbId,
    ) -> StoreResult<SellerSnapshot> {
        if !SellerRepo::lock_for_update(&mut *conn, seller_id).await? {
            return Err(CoreError::NotFound {
                entity: "Seller",
                id: seller_id,
            }
            .into());
        }

        let query = format!(
            "SELECT id, seller_id, {ATTRIBUTE_COLUMNS}, modifier_id, created_at, expired_at \
             FROM seller_snapshots \
             WHERE seller_id = $1 AND expired_at = $2 \
             FOR UPDATE"
        );
        let row = sqlx::query_as::<_, SellerSnapshotRow>(&query)
            .bind(seller_id)
            .bind(sentinel_expiry())
            .fetch_optional(&mut *conn)
            .await?;
        row.map(SellerSnapshot::from).ok_or_else(|| {
            CoreError::ConcurrentModification(format!(
                "seller {seller_id} has no active snapshot under lock"
            ))
            .into()
        })
    }

    /// Insert the first snapshot of a seller.
    ///
    /// Fails with `CoreError::Conflict` if the seller already has an active
    /// snapshot (enforced by `uq_seller_snapshots_active`).
    pub async fn create_initial(
        conn: &mut PgConnection,
        seller_id: DbId,
        attributes: &SellerAttributes,
        actor_id: Option<DbId>,
        created_at: Timestamp,
    ) -> StoreResult<SellerSnapshot> {
        insert_active(conn, seller_id, attributes, actor_id, created_at).await
    }

    /// Close the active snapshot and open a new one with `changes` overlaid.
    ///
    /// Must run inside a transaction; nothing is visible until the caller
    /// commits. Replaces manager contacts when `changes.managers` is set and
    /// appends a status record when the status id moves.
    pub async fn revise(
        conn: &mut PgConnection,
        seller_id: DbId,
        changes: &SellerChangeSet,
        actor_id: DbId,
    ) -> StoreResult<SellerSnapshot> {
        let previous = Self::get_active_for_update(&mut *conn, seller_id).await?;
        // The closed row must not expire before it was created.
        let now = Utc::now().max(previous.created_at);

        let closed = sqlx::query(
            "UPDATE seller_snapshots SET expired_at = $2 WHERE id = $1 AND expired_at = $3",
        )
        .bind(previous.id)
        .bind(SnapshotValidity::Superseded { at: now }.to_expiry())
        .bind(sentinel_expiry())
        .execute(&mut *conn)
        .await?;
        if closed.rows_affected() != 1 {
            return Err(CoreError::ConcurrentModification(format!(
                "snapshot {} was closed by another transaction",
                previous.id
            ))
            .into());
        }

        let next = changes.apply_to(&previous.attributes);
        let snapshot = insert_active(&mut *conn, seller_id, &next, Some(actor_id), now).await?;

        if let Some(managers) = &changes.managers {
            ManagerContactRepo::replace_all(&mut *conn, seller_id, managers, now).await?;
        }

        if let Some(status_id) = changes.status_transition(&previous.attributes) {
            StatusHistoryRepo::append(&mut *conn, seller_id, status_id, Some(actor_id), now)
                .await?;
        }

        Ok(snapshot)
    }

    /// Every snapshot of a seller, newest first.
    pub async fn list_for_seller<'e>(
        executor: impl PgExecutor<'e>,
        seller_id: DbId,
    ) -> StoreResult<Vec<SellerSnapshot>> {
        let query = format!(
            "SELECT id, seller_id, {ATTRIBUTE_COLUMNS}, modifier_id, created_at, expired_at \
             FROM seller_snapshots \
             WHERE seller_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, SellerSnapshotRow>(&query)
            .bind(seller_id)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(SellerSnapshot::from).collect())
    }
}

/// Insert an active snapshot row and return it.
async fn insert_active(
    conn: &mut PgConnection,
    seller_id: DbId,
    attributes: &SellerAttributes,
    modifier_id: Option<DbId>,
    created_at: Timestamp,
) -> StoreResult<SellerSnapshot> {
    let placeholders = (1..=ATTRIBUTE_COUNT + 4)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let query = format!(
        "INSERT INTO seller_snapshots \
            ({ATTRIBUTE_COLUMNS}, seller_id, modifier_id, created_at, expired_at) \
         VALUES ({placeholders}) \
         RETURNING id, seller_id, {ATTRIBUTE_COLUMNS}, modifier_id, created_at, expired_at"
    );

    let row = bind_attributes(sqlx::query_as::<_, SellerSnapshotRow>(&query), attributes)
        .bind(seller_id)
        .bind(modifier_id)
        .bind(created_at)
        .bind(SnapshotValidity::Active.to_expiry())
        .fetch_one(conn)
        .await?;
    Ok(row.into())
}

/// Bind every attribute in [`ATTRIBUTE_COLUMNS`] order.
fn bind_attributes<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    a: &'q SellerAttributes,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    q.bind(a.status_id)
        .bind(a.property_id)
        .bind(&a.account)
        .bind(&a.password_hash)
        .bind(&a.korean_name)
        .bind(&a.english_name)
        .bind(&a.cs_phone)
        .bind(&a.profile_image)
        .bind(&a.background_image)
        .bind(&a.simple_description)
        .bind(&a.detail_description)
        .bind(&a.zip_code)
        .bind(&a.address)
        .bind(&a.detail_address)
        .bind(a.open_time)
        .bind(a.close_time)
        .bind(a.bank_id)
        .bind(&a.bank_account_number)
        .bind(&a.bank_account_name)
        .bind(&a.shipping_information)
        .bind(&a.exchange_refund_information)
        .bind(&a.model_height)
        .bind(&a.model_top_size)
        .bind(&a.model_bottom_size)
        .bind(&a.model_feet_size)
        .bind(&a.shopping_feedtext)
        .bind(a.registered_product_count)
        .bind(a.is_master)
}

/// [`ATTRIBUTE_COLUMNS`] prefixed with a table alias.
fn qualified_attributes(alias: &str) -> String {
    ATTRIBUTE_COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_count_matches_column_list() {
        assert_eq!(ATTRIBUTE_COLUMNS.split(',').count(), ATTRIBUTE_COUNT);
    }

    #[test]
    fn qualified_attributes_prefixes_every_column() {
        let qualified = qualified_attributes("ss");
        assert!(qualified.starts_with("ss.status_id, ss.property_id"));
        assert!(qualified.ends_with("ss.is_master"));
        assert_eq!(qualified.matches("ss.").count(), ATTRIBUTE_COUNT);
    }
}
