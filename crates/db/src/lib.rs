//! Persistence layer for the seller back office.
//!
//! Repositories are zero-sized structs whose methods take the executor or
//! connection to run on. Operations that must be atomic take
//! `&mut PgConnection` and expect the caller to own the transaction.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

pub mod error;
pub mod models;
pub mod repositories;
pub mod workflow;

pub use error::StoreError;
pub use workflow::SellerWorkflow;

pub type DbPool = sqlx::PgPool;

/// Default pool size when `DB_MAX_CONNECTIONS` is not set.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run a trivial query to verify the database is reachable.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Begin a transaction whose row-lock waits give up after `lock_timeout_ms`.
///
/// A revision that cannot lock the active snapshot in time fails with
/// PostgreSQL `55P03`, which [`StoreError`] reports as a concurrent
/// modification.
pub async fn begin_with_lock_timeout(
    pool: &PgPool,
    lock_timeout_ms: u64,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    // SET does not accept bind parameters.
    sqlx::query(&format!("SET LOCAL lock_timeout = {lock_timeout_ms}"))
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Begin a read-only transaction in which every statement sees the same
/// snapshot of the database.
///
/// The snapshot is taken by the first query, so statements that must agree
/// with each other (a count and the page it describes) run inside it.
pub async fn begin_consistent_read(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}
