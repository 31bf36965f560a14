//! Repository for the `sellers` identity table.

use sqlx::{PgConnection, PgExecutor};
use sellerdesk_core::types::{DbId, Timestamp};
use sellerdesk_core::versioning::sentinel_expiry;

use crate::models::seller::{Seller, SellerCredentials, SellerLookup};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, registered_at, is_deleted, deleted_at";

/// Provides identity, soft-delete and lookup operations for sellers.
pub struct SellerRepo;

impl SellerRepo {
    /// Insert a new seller identity registered at `registered_at`.
    pub async fn insert(
        conn: &mut PgConnection,
        registered_at: Timestamp,
    ) -> Result<Seller, sqlx::Error> {
        let query = format!("INSERT INTO sellers (registered_at) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Seller>(&query)
            .bind(registered_at)
            .fetch_one(conn)
            .await
    }

    /// Find a seller by id. Excludes soft-deleted sellers.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Seller>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sellers WHERE id = $1 AND is_deleted = false");
        sqlx::query_as::<_, Seller>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lock the seller row for the rest of the transaction.
    ///
    /// Returns `false` when the seller does not exist or is soft-deleted.
    pub async fn lock_for_update(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let locked = sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM sellers WHERE id = $1 AND is_deleted = false FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(locked.is_some())
    }

    /// Soft-delete a seller. Returns `true` if a row was marked deleted.
    pub async fn soft_delete<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sellers SET is_deleted = true, deleted_at = $2 \
             WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .bind(at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Sellers whose active korean name contains `pattern`, for the product
    /// registration picker. `pattern` is a ready-made `LIKE` pattern.
    pub async fn lookup_by_name<'e>(
        executor: impl PgExecutor<'e>,
        pattern: &str,
        limit: i64,
    ) -> Result<Vec<SellerLookup>, sqlx::Error> {
        sqlx::query_as::<_, SellerLookup>(
            "SELECT s.id AS seller_id, ss.korean_name, ss.profile_image, ss.property_id \
             FROM sellers s \
             JOIN seller_snapshots ss ON ss.seller_id = s.id AND ss.expired_at = $1 \
             WHERE s.is_deleted = false AND ss.korean_name ILIKE $2 \
             ORDER BY ss.korean_name ASC, s.id ASC \
             LIMIT $3",
        )
        .bind(sentinel_expiry())
        .bind(pattern)
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    /// Credentials of the non-deleted seller whose active snapshot owns `account`.
    pub async fn find_credentials<'e>(
        executor: impl PgExecutor<'e>,
        account: &str,
    ) -> Result<Option<SellerCredentials>, sqlx::Error> {
        sqlx::query_as::<_, SellerCredentials>(
            "SELECT s.id AS seller_id, ss.password_hash, ss.status_id, ss.is_master \
             FROM sellers s \
             JOIN seller_snapshots ss ON ss.seller_id = s.id AND ss.expired_at = $1 \
             WHERE s.is_deleted = false AND ss.account = $2",
        )
        .bind(sentinel_expiry())
        .bind(account)
        .fetch_optional(executor)
        .await
    }
}
