//! Repository layer.
//!
//! Each repository is a zero-sized struct. Single-statement methods accept
//! any `PgExecutor` (a pool or `&mut *tx`); multi-statement methods take
//! `&mut PgConnection` and run inside the caller's transaction.

pub mod manager_contact_repo;
pub mod seller_repo;
pub mod seller_search_repo;
pub mod seller_snapshot_repo;
pub mod status_history_repo;
pub mod uniqueness_repo;

pub use manager_contact_repo::ManagerContactRepo;
pub use seller_repo::SellerRepo;
pub use seller_search_repo::SellerSearchRepo;
pub use seller_snapshot_repo::SellerSnapshotRepo;
pub use status_history_repo::StatusHistoryRepo;
pub use uniqueness_repo::{IdentifierIntents, UniquenessRepo};
