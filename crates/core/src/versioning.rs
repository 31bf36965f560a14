//! Temporal validity of seller snapshots.
//!
//! Snapshots follow a "close old row / open new row" pattern. In memory a
//! snapshot is either [`SnapshotValidity::Active`] or superseded at a known
//! instant; the far-future sentinel only exists at the storage boundary,
//! where range queries and the partial unique index rely on it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Timestamp;

/// `9999-12-31T23:59:59Z` as a Unix timestamp.
pub const SENTINEL_EXPIRY_UNIX: i64 = 253_402_300_799;

/// The stored `expired_at` value of the active snapshot.
pub fn sentinel_expiry() -> Timestamp {
    DateTime::<Utc>::from_timestamp(SENTINEL_EXPIRY_UNIX, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether a snapshot is the current version or a closed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SnapshotValidity {
    Active,
    Superseded { at: Timestamp },
}

impl SnapshotValidity {
    /// Decode the stored `expired_at` column.
    pub fn from_expiry(expired_at: Timestamp) -> Self {
        if expired_at >= sentinel_expiry() {
            SnapshotValidity::Active
        } else {
            SnapshotValidity::Superseded { at: expired_at }
        }
    }

    /// Encode for the `expired_at` column.
    pub fn to_expiry(self) -> Timestamp {
        match self {
            SnapshotValidity::Active => sentinel_expiry(),
            SnapshotValidity::Superseded { at } => at,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, SnapshotValidity::Active)
    }

    pub fn superseded_at(self) -> Option<Timestamp> {
        match self {
            SnapshotValidity::Active => None,
            SnapshotValidity::Superseded { at } => Some(at),
        }
    }
}
