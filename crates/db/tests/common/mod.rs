//! Shared fixtures for seller repository integration tests.
#![allow(dead_code)]

use sqlx::PgPool;
use sellerdesk_core::status::SellerProperty;
use sellerdesk_core::types::DbId;
use sellerdesk_db::error::StoreResult;
use sellerdesk_db::models::manager_contact::NewManagerContact;
use sellerdesk_db::models::seller::NewSeller;
use sellerdesk_db::models::snapshot::{SellerChangeSet, SellerSnapshot};
use sellerdesk_db::SellerWorkflow;

/// Actor id used for revisions made by an administrator in tests.
pub const MASTER_ACTOR: DbId = 9_000;

pub fn manager(phone: &str) -> NewManagerContact {
    NewManagerContact {
        name: Some(format!("manager {phone}")),
        email: Some(format!("m{}@example.com", phone.replace('-', ""))),
        phone_number: phone.to_string(),
    }
}

/// A valid signup whose identifiers are derived from `n`.
pub fn new_seller(n: u32) -> NewSeller {
    NewSeller {
        account: format!("seller_{n:03}"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$test$test".to_string(),
        korean_name: format!("셀러 {n}"),
        english_name: format!("seller {n}"),
        cs_phone: format!("02-100-{n:04}"),
        property_id: SellerProperty::Market.id(),
        managers: vec![manager(&format!("010-2000-{n:04}"))],
    }
}

/// Sign up in its own committed transaction.
pub async fn sign_up(pool: &PgPool, seller: &NewSeller) -> StoreResult<DbId> {
    let mut tx = pool.begin().await?;
    let id = SellerWorkflow::sign_up(&mut *tx, seller, None).await?;
    tx.commit().await?;
    Ok(id)
}

/// Revise in its own committed transaction.
pub async fn revise(
    pool: &PgPool,
    seller_id: DbId,
    changes: &SellerChangeSet,
) -> StoreResult<SellerSnapshot> {
    let mut tx = pool.begin().await?;
    let snapshot = SellerWorkflow::revise_profile(&mut *tx, seller_id, changes, MASTER_ACTOR).await?;
    tx.commit().await?;
    Ok(snapshot)
}

/// Number of snapshots of a seller carrying the active sentinel.
pub async fn active_snapshot_count(pool: &PgPool, seller_id: DbId) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)::BIGINT FROM seller_snapshots \
         WHERE seller_id = $1 AND expired_at = '9999-12-31 23:59:59+00'",
    )
    .bind(seller_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn table_count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*)::BIGINT FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
